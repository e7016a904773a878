//! 视图模型
//!
//! 交给外部渲染端的纯数据结构，不携带任何绘图或布局逻辑。
//! 所有集合都保持数据集的原始行顺序。

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::conversation::{ChatMessage, QuickQuery};
use crate::models::observation::{FloatObservation, MeasurementField};

/// 命令处理后交给渲染端的视图模型
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewModel {
    /// 聊天页
    Chatbot(ChatbotView),
    /// 快捷查询结果
    QuickQueryResult(QuickQueryView),
    /// 数据浏览页
    Explore(ExploreView),
    /// 可视化页
    Visualizations(VisualizationsView),
    /// 查询历史页
    History(HistoryView),
}

/// 聊天页视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatbotView {
    /// 会话日志，按插入顺序
    pub messages: Vec<ChatMessage>,
    /// 可用的快捷查询按钮
    pub quick_queries: Vec<QuickQueryOption>,
    /// 完整样例数据表
    pub dataset: TableView,
    /// 浮标位置图，按温度着色
    pub map: GeoScatterView,
}

/// 快捷查询按钮
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuickQueryOption {
    /// 主题标识
    pub topic: QuickQuery,
    /// 按钮文案
    pub label: String,
}

/// 快捷查询结果视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuickQueryView {
    /// 刚写入日志的助手回复
    pub reply: ChatMessage,
    /// 回复下方展示的数据面板
    pub panel: DataPanel,
}

/// 随回复展示的数据面板
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataPanel {
    /// 观测行表格
    Table(TableView),
    /// 单指标序列
    Series(SeriesView),
}

/// 数据浏览页视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExploreView {
    /// 过滤起始日期（含）
    pub start: NaiveDate,
    /// 过滤结束日期（含）
    pub end: NaiveDate,
    /// 展示的度量列
    pub parameter: MeasurementField,
    /// 过滤后的观测行
    pub table: TableView,
    /// 每个浮标一条序列的折线图
    pub chart: LineChartView,
}

/// 可视化页视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisualizationsView {
    /// 浮标位置图，按盐度着色
    pub map: GeoScatterView,
    /// 盐度与温度随日期变化
    pub lines: LineChartView,
    /// 盐度-温度散点
    pub scatter: ScatterPlotView,
}

/// 查询历史页视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryView {
    /// 全部历史消息，按插入顺序
    pub entries: Vec<ChatMessage>,
    /// 消息总数
    pub total: usize,
}

/// 表格视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableView {
    /// 列名
    pub columns: Vec<String>,
    /// 数据行
    pub rows: Vec<FloatObservation>,
}

impl TableView {
    /// 从观测行构建表格
    pub fn from_rows(rows: Vec<FloatObservation>) -> Self {
        Self {
            columns: FloatObservation::COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows,
        }
    }
}

/// 单指标序列
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesView {
    /// 序列名称
    pub name: String,
    /// 数据点，按数据集行顺序
    pub points: Vec<SeriesPoint>,
}

/// 序列数据点
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    /// 观测日期
    pub date: NaiveDate,
    /// 度量值
    pub value: f64,
}

impl SeriesView {
    /// 从观测行提取某个度量列的序列
    pub fn for_field(
        name: impl Into<String>,
        rows: &[FloatObservation],
        field: MeasurementField,
    ) -> Self {
        Self {
            name: name.into(),
            points: rows
                .iter()
                .map(|obs| SeriesPoint {
                    date: obs.date,
                    value: obs.value(field),
                })
                .collect(),
        }
    }
}

/// 折线图视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineChartView {
    /// 图表标题，没有则不显示
    pub title: Option<String>,
    /// 序列集合
    pub series: Vec<SeriesView>,
}

impl LineChartView {
    /// 每个浮标一条序列
    ///
    /// 序列顺序按浮标在观测行中的首次出现排列。
    pub fn per_float(
        title: impl Into<String>,
        rows: &[FloatObservation],
        field: MeasurementField,
    ) -> Self {
        let mut series: Vec<SeriesView> = Vec::new();
        for obs in rows {
            let point = SeriesPoint {
                date: obs.date,
                value: obs.value(field),
            };
            match series.iter_mut().find(|s| s.name == obs.float_id) {
                Some(existing) => existing.points.push(point),
                None => series.push(SeriesView {
                    name: obs.float_id.clone(),
                    points: vec![point],
                }),
            }
        }
        Self {
            title: Some(title.into()),
            series,
        }
    }

    /// 全部度量列各一条序列
    pub fn measurements(rows: &[FloatObservation]) -> Self {
        Self {
            title: None,
            series: MeasurementField::ALL
                .iter()
                .map(|field| SeriesView::for_field(field.to_string(), rows, *field))
                .collect(),
        }
    }
}

/// 地理散点视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeoScatterView {
    /// 着色使用的度量列名
    pub color_by: String,
    /// 浮标位置点
    pub points: Vec<GeoPoint>,
}

/// 地理散点数据点
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeoPoint {
    /// 浮标标识
    pub float_id: String,
    /// 纬度
    pub lat: f64,
    /// 经度
    pub lon: f64,
    /// 着色值
    pub value: f64,
}

impl GeoScatterView {
    /// 从观测行构建位置图
    pub fn from_rows(rows: &[FloatObservation], color_by: MeasurementField) -> Self {
        Self {
            color_by: color_by.to_string(),
            points: rows
                .iter()
                .map(|obs| GeoPoint {
                    float_id: obs.float_id.clone(),
                    lat: obs.lat,
                    lon: obs.lon,
                    value: obs.value(color_by),
                })
                .collect(),
        }
    }
}

/// 散点图视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScatterPlotView {
    /// 横轴度量列名
    pub x_field: String,
    /// 纵轴度量列名
    pub y_field: String,
    /// 数据点
    pub points: Vec<ScatterPoint>,
}

/// 散点数据点
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScatterPoint {
    /// 浮标标识，渲染端按此着色
    pub float_id: String,
    /// 横轴值
    pub x: f64,
    /// 纵轴值
    pub y: f64,
    /// 点大小
    pub size: f64,
}

impl ScatterPlotView {
    /// 盐度-温度散点，点大小取温度
    pub fn salinity_temperature(rows: &[FloatObservation]) -> Self {
        Self {
            x_field: MeasurementField::Salinity.to_string(),
            y_field: MeasurementField::Temperature.to_string(),
            points: rows
                .iter()
                .map(|obs| ScatterPoint {
                    float_id: obs.float_id.clone(),
                    x: obs.salinity,
                    y: obs.temperature,
                    size: obs.temperature,
                })
                .collect(),
        }
    }
}

/// 快捷查询按钮列表，顺序与页面一致
pub fn quick_query_options() -> Vec<QuickQueryOption> {
    QuickQuery::ALL
        .iter()
        .map(|topic| QuickQueryOption {
            topic: *topic,
            label: topic.label().to_string(),
        })
        .collect()
}
