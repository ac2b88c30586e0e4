pub mod json;
pub mod terminal;

use crate::findings::ScanReport;

pub trait Reporter {
    fn report(&self, report: &ScanReport) -> String;
}
