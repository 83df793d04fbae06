//! Export of fleet results

mod excel;

pub use excel::export_to_excel;
