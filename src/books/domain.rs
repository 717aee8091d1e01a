use crate::core::domain::Identifiable;

pub mod model;

pub trait Book: Identifiable {
    fn title(&self) -> &str;
    fn author(&self) -> &str;

    // e.g. "Ulysses" by James Joyce (ISBN: 978-0199535675)
    fn describe(&self) -> String {
        format!("\"{}\" by {} (ISBN: {})", self.title(), self.author(), self.id())
    }
}
