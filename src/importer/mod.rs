// ==========================================
// 工包工时核算系统 - 导入层
// ==========================================
// 职责: 外部文件 → 领域数据（工包行 / 参考记录 / 查找表）
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod reference_loader;
pub mod workpack_importer;

pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, SheetData, UniversalFileParser};
pub use reference_loader::ReferenceLoader;
pub use workpack_importer::WorkpackImporter;
