//! CSV 导出模块
//!
//! 把观测行编码为 UTF-8 CSV 文本，首行为表头，
//! 数值按最短无损十进制输出，重新解析可还原原值。

use crate::dataset::Projection;
use crate::error::{AppError, Result};
use crate::models::FloatObservation;

/// 下载时使用的文件名
pub const EXPORT_FILE_NAME: &str = "argo_data.csv";

/// 把观测行编码为 CSV 文本
///
/// 列顺序与 [`FloatObservation::COLUMNS`] 一致，空数据集仍输出表头。
pub fn observations_to_csv(rows: &[FloatObservation]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if rows.is_empty() {
        writer.write_record(FloatObservation::COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }

    finish(writer)
}

/// 从 CSV 文本解析观测行
pub fn observations_from_csv(data: &str) -> Result<Vec<FloatObservation>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// 把列投影编码为 CSV 文本
pub fn projection_to_csv(projection: &Projection) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&projection.columns)?;
    for row in &projection.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.date.to_string());
        record.extend(row.values.iter().map(|v| format_value(*v)));
        writer.write_record(&record)?;
    }

    finish(writer)
}

// 整数值保留一位小数，列仍可被下游按浮点解析
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}
