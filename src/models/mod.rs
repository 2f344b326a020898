pub mod record;
pub mod table;
pub mod workbook;
pub mod worksheet;

pub use record::SheetRecord;
pub use table::{
    DeletedRows, HeaderRename, NewTable, RecordCriteria, Table, TableRecordFilter,
    TableRecordQuery,
};
pub use workbook::{Workbook, WorkbookListOptions};
pub use worksheet::{
    WorksheetRecordDeletion, WorksheetRecordQuery, WorksheetRecordUpdate, WorksheetRef,
};
