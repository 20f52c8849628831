/// Field-by-field merge of two option sets where `overrides` wins.
pub trait Overlay {
    fn overlay(self, overrides: Self) -> Self;
}
