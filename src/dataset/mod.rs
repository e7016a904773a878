//! 固定数据集模块
//!
//! 内置 5 行 ARGO 浮标样例观测，整个进程生命周期内只读。
//! 所有查询操作都返回克隆数据，互不影响。

pub mod export;

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{FloatObservation, MeasurementField};

/// 内置样例观测，行顺序固定
static SAMPLE_OBSERVATIONS: Lazy<Vec<FloatObservation>> = Lazy::new(|| {
    vec![
        observation("ARGO001", 1.2, 33.5, (2023, 3, 5), 35.1, 28.3),
        observation("ARGO002", -2.1, 35.0, (2023, 3, 12), 34.9, 27.8),
        observation("ARGO003", 0.5, 72.8, (2023, 3, 20), 35.3, 28.5),
        observation("ARGO004", 15.0, 60.1, (2023, 4, 2), 36.1, 26.4),
        observation("ARGO005", -4.5, 50.0, (2023, 3, 25), 34.8, 28.0),
    ]
});

fn observation(
    float_id: &str,
    lat: f64,
    lon: f64,
    date: (i32, u32, u32),
    salinity: f64,
    temperature: f64,
) -> FloatObservation {
    let (year, month, day) = date;
    FloatObservation {
        float_id: float_id.to_string(),
        lat,
        lon,
        date: NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date"),
        salinity,
        temperature,
    }
}

/// 列投影结果
///
/// `columns` 首列恒为 `date`，其后是请求的度量列；
/// `rows` 保持数据集的原始行顺序。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Projection {
    /// 列名
    pub columns: Vec<String>,
    /// 投影行
    pub rows: Vec<ProjectionRow>,
}

/// 投影后的单行数据
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectionRow {
    /// 观测日期
    pub date: NaiveDate,
    /// 度量值，顺序与 `Projection::columns` 中的度量列一致
    pub values: Vec<f64>,
}

/// 固定浮标数据集
///
/// 启动时构建一次，之后只读。查询方法都是纯函数。
#[derive(Debug, Clone)]
pub struct FloatDataset {
    observations: Vec<FloatObservation>,
}

impl FloatDataset {
    /// 内置样例数据集
    pub fn sample() -> Self {
        Self {
            observations: SAMPLE_OBSERVATIONS.clone(),
        }
    }

    /// 从给定观测构建数据集
    pub fn from_observations(observations: Vec<FloatObservation>) -> Self {
        Self { observations }
    }

    /// 从 CSV 文件加载数据集
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let observations = export::observations_from_csv(&data)?;
        Ok(Self::from_observations(observations))
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// 数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// 按原始顺序访问全部观测
    pub fn all(&self) -> &[FloatObservation] {
        &self.observations
    }

    /// 按日期区间过滤（闭区间）
    ///
    /// `end` 早于 `start` 视为调用方错误，不做自动交换。
    pub fn filter_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FloatObservation>> {
        if end < start {
            return Err(AppError::InvalidDateRange { start, end });
        }
        Ok(self
            .observations
            .iter()
            .filter(|obs| obs.date >= start && obs.date <= end)
            .cloned()
            .collect())
    }

    /// 按年月过滤
    pub fn filter_by_month(&self, year: i32, month: u32) -> Vec<FloatObservation> {
        self.observations
            .iter()
            .filter(|obs| obs.date.year() == year && obs.date.month() == month)
            .cloned()
            .collect()
    }

    /// 按列名投影
    ///
    /// 列名解析失败返回 [`AppError::InvalidField`]，此时不产生部分结果。
    pub fn select_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<Projection> {
        let fields = columns
            .iter()
            .map(|name| name.as_ref().parse::<MeasurementField>())
            .collect::<Result<Vec<_>>>()?;
        Ok(self.select_fields(&fields))
    }

    /// 按已解析的度量列投影
    pub fn select_fields(&self, fields: &[MeasurementField]) -> Projection {
        let mut columns = Vec::with_capacity(fields.len() + 1);
        columns.push("date".to_string());
        columns.extend(fields.iter().map(|f| f.to_string()));

        let rows = self
            .observations
            .iter()
            .map(|obs| ProjectionRow {
                date: obs.date,
                values: fields.iter().map(|f| obs.value(*f)).collect(),
            })
            .collect();

        Projection { columns, rows }
    }
}

impl Default for FloatDataset {
    fn default() -> Self {
        Self::sample()
    }
}
