use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

/// 可选的度量列
///
/// 数据集中允许按列投影或作为图表参数的物理量。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    /// 盐度（PSU）
    #[display("salinity")]
    Salinity,
    /// 温度（摄氏度）
    #[display("temperature")]
    Temperature,
}

impl MeasurementField {
    /// 全部度量列
    pub const ALL: [MeasurementField; 2] = [MeasurementField::Salinity, MeasurementField::Temperature];

    /// 图表标题用的首字母大写名称
    pub fn title(&self) -> &'static str {
        match self {
            MeasurementField::Salinity => "Salinity",
            MeasurementField::Temperature => "Temperature",
        }
    }
}

impl FromStr for MeasurementField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "salinity" => Ok(MeasurementField::Salinity),
            "temperature" => Ok(MeasurementField::Temperature),
            other => Err(AppError::InvalidField(other.to_string())),
        }
    }
}

/// 浮标观测记录
///
/// 数据集的一行，字段顺序即导出 CSV 的列顺序。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloatObservation {
    /// 浮标标识
    pub float_id: String,

    /// 纬度
    pub lat: f64,

    /// 经度
    pub lon: f64,

    /// 观测日期
    pub date: NaiveDate,

    /// 盐度（PSU）
    pub salinity: f64,

    /// 温度（摄氏度）
    pub temperature: f64,
}

impl FloatObservation {
    /// 数据集列名，顺序固定
    pub const COLUMNS: [&'static str; 6] = ["float_id", "lat", "lon", "date", "salinity", "temperature"];

    /// 读取指定度量列的值
    pub fn value(&self, field: MeasurementField) -> f64 {
        match field {
            MeasurementField::Salinity => self.salinity,
            MeasurementField::Temperature => self.temperature,
        }
    }
}
