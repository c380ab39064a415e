// ==========================================
// 工包工时核算系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 产出: 按表头映射的原始字符串记录（SheetData），不做业务转换
// 约定: CSV 视为单一工作表，工作表名 = 文件名（不含扩展名）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// RawRecord / SheetData
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub row_number: usize, // 数据行号（从 1 开始，不含表头）
    pub values: HashMap<String, String>,
}

impl RawRecord {
    /// 取值（trim 后为空视为缺失）
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl SheetData {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column.trim())
    }

    /// 返回不存在的列
    pub fn missing_columns<'c>(&self, columns: &[&'c str]) -> Vec<&'c str> {
        columns
            .iter()
            .copied()
            .filter(|c| !self.has_column(c))
            .collect()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    /// 工作表名列表
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>>;

    /// 解析指定工作表（None = 第一个）
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<SheetData>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 按表头组装记录；完全空白的行跳过
fn build_records<R, I, S>(headers: &[String], rows: R) -> Vec<RawRecord>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();

    for (idx, row) in rows.into_iter().enumerate() {
        let mut values = HashMap::new();
        for (col_idx, value) in row.into_iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                values.insert(header.clone(), value.as_ref().trim().to_string());
            }
        }

        // 跳过完全空白的行
        if values.values().all(|v| v.is_empty()) {
            continue;
        }

        records.push(RawRecord {
            row_number: idx + 1,
            values,
        });
    }

    records
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        ensure_exists(file_path)?;
        Ok(vec![file_stem(file_path)])
    }

    fn parse_sheet(&self, file_path: &Path, _sheet: Option<&str>) -> ImportResult<SheetData> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        Ok(SheetData {
            name: file_stem(file_path),
            records: build_records(&headers, rows),
            headers,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

impl FileParser for ExcelParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        ensure_exists(file_path)?;
        let workbook = open_workbook_auto(file_path)?;
        Ok(workbook.sheet_names())
    }

    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<SheetData> {
        ensure_exists(file_path)?;
        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(name) => sheet_names
                .iter()
                .find(|s| s.as_str() == name)
                .cloned()
                .ok_or_else(|| ImportError::SheetNotFound {
                    file: file_path.display().to_string(),
                    sheet: name.to_string(),
                })?,
            None => sheet_names.first().cloned().ok_or_else(|| {
                ImportError::ExcelParseError("Excel 文件无工作表".to_string())
            })?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell_to_string(cell).trim().to_string())
                .collect(),
            None => Vec::new(),
        };

        let data_rows = rows.map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

        Ok(SheetData {
            name: sheet_name,
            records: build_records(&headers, data_rows),
            headers,
        })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn is_supported(path: &Path) -> bool {
        matches!(extension(path).as_str(), "csv" | "xlsx" | "xls")
    }

    fn parser_for(&self, path: &Path) -> ImportResult<Box<dyn FileParser>> {
        match extension(path).as_str() {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" | "xls" => Ok(Box::new(ExcelParser)),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 待读取的工作表名（filter 非空时取 filter，按 filter 顺序；CSV 忽略 filter）
    pub fn select_sheet_names(&self, path: &Path, filter: &[String]) -> ImportResult<Vec<String>> {
        if filter.is_empty() || extension(path) == "csv" {
            self.sheet_names(path)
        } else {
            Ok(filter.to_vec())
        }
    }

    /// 解析全部工作表（任一工作表失败即整体失败）
    pub fn parse_all_sheets(&self, path: &Path, filter: &[String]) -> ImportResult<Vec<SheetData>> {
        let parser = self.parser_for(path)?;
        self.select_sheet_names(path, filter)?
            .iter()
            .map(|name| parser.parse_sheet(path, Some(name)))
            .collect()
    }
}

impl FileParser for UniversalFileParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        self.parser_for(file_path)?.sheet_names(file_path)
    }

    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<SheetData> {
        self.parser_for(file_path)?.parse_sheet(file_path, sheet)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file("Seq. No.,Title,Planned Mhrs\n2.1,24-045-00 (00) - A,120\n2.2,B,60\n");

        let sheet = CsvParser.parse_sheet(file.path(), None).unwrap();

        assert_eq!(sheet.headers, vec!["Seq. No.", "Title", "Planned Mhrs"]);
        assert_eq!(sheet.records.len(), 2);
        assert_eq!(sheet.records[0].get("Seq. No."), Some("2.1"));
        assert_eq!(sheet.records[1].get("Planned Mhrs"), Some("60"));
        assert_eq!(sheet.records[1].row_number, 2);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_sheet(Path::new("non_existent.csv"), None);
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let file = csv_file("Seq. No.,Planned Mhrs\n2.1,60\n,\n2.2,30\n");

        let sheet = CsvParser.parse_sheet(file.path(), None).unwrap();

        assert_eq!(sheet.records.len(), 2);
        // 行号保留原始位置
        assert_eq!(sheet.records[1].row_number, 3);
    }

    #[test]
    fn test_csv_sheet_name_is_file_stem() {
        let file = csv_file("A\n1\n");
        let names = UniversalFileParser.sheet_names(file.path()).unwrap();
        let stem = file.path().file_stem().unwrap().to_string_lossy().to_string();
        assert_eq!(names, vec![stem]);
    }

    #[test]
    fn test_blank_value_reads_as_missing() {
        let file = csv_file("A,B\n1,  \n");
        let sheet = CsvParser.parse_sheet(file.path(), None).unwrap();
        assert_eq!(sheet.records[0].get("B"), None);
        assert!(sheet.has_column("B"));
        assert_eq!(sheet.missing_columns(&["A", "C"]), vec!["C"]);
    }

    #[test]
    fn test_unsupported_format() {
        let result = UniversalFileParser.parse_sheet(Path::new("workpack.pdf"), None);
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
        assert!(!UniversalFileParser::is_supported(Path::new("a.txt")));
        assert!(UniversalFileParser::is_supported(Path::new("a.XLSX")));
    }
}
