use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Records carrying a monetary amount that aggregations can sum.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Records positioned on the calendar. `None` means the record has no usable
/// date and is excluded from every date-windowed aggregate.
pub trait Dated {
    fn record_date(&self) -> Option<NaiveDate>;
}

/// Records that may point at a category.
pub trait BelongsToCategory {
    fn category_id(&self) -> Option<Uuid>;
}

impl<T: Amounted + ?Sized> Amounted for &T {
    fn amount(&self) -> Decimal {
        (**self).amount()
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn record_date(&self) -> Option<NaiveDate> {
        (**self).record_date()
    }
}

impl<T: BelongsToCategory + ?Sized> BelongsToCategory for &T {
    fn category_id(&self) -> Option<Uuid> {
        (**self).category_id()
    }
}

// Re-export common dependencies for consumers of the domain types.
pub use chrono;
pub use rust_decimal;
pub use serde;
pub use uuid;
