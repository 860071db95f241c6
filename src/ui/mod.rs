//! egui front end: side panel controls, charts and the data table.

pub mod panels;
pub mod plot;
pub mod table;
