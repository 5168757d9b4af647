// Output formatting — CSV/JSON export files and terminal display.

pub mod csv;
pub mod export;
pub mod terminal;
