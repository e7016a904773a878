//! 仪表盘服务
//!
//! 把用户交互命令派发给聊天与数据集操作，并组装渲染端需要的视图模型。
//! 渲染本身完全由外部前端负责。

pub mod views;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::dataset::FloatDataset;
use crate::error::{AppError, Result};
use crate::models::conversation::QuickQuery;
use crate::models::observation::MeasurementField;
use crate::models::session::{Session, UserRole};
use crate::services::chat::{ChatService, QuickView};
use crate::storage::memory::SessionRepository;

use views::{
    ChatbotView, DataPanel, ExploreView, GeoScatterView, HistoryView, LineChartView,
    QuickQueryView, ScatterPlotView, SeriesView, TableView, ViewModel, VisualizationsView,
    quick_query_options,
};

/// 导航页签
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTab {
    /// 聊天页
    Chatbot,
    /// 数据浏览页
    ExploreData,
    /// 可视化页
    Visualizations,
    /// 查询历史页
    QueryHistory,
}

/// 用户交互命令
///
/// 每个命令对应界面上的一次操作，处理结果固定为一个视图模型。
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 提交自由文本查询
    SubmitQuery { role: UserRole, text: String },
    /// 点击快捷查询按钮
    QuickQuery { topic: QuickQuery },
    /// 切换页签
    Navigate { tab: NavigationTab },
    /// 调整数据浏览过滤条件
    Explore {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        parameter: Option<MeasurementField>,
    },
}

/// 仪表盘服务 trait
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// 处理一条命令并返回结果视图
    async fn handle(&self, session_id: &str, command: Command) -> Result<ViewModel>;
}

/// 仪表盘服务实现
pub struct DashboardServiceImpl {
    dataset: Arc<FloatDataset>,
    sessions: Arc<dyn SessionRepository>,
    chat: Arc<dyn ChatService>,
}

impl DashboardServiceImpl {
    /// 创建新的服务实例
    pub fn new(
        dataset: Arc<FloatDataset>,
        sessions: Arc<dyn SessionRepository>,
        chat: Arc<dyn ChatService>,
    ) -> Self {
        Self {
            dataset,
            sessions,
            chat,
        }
    }

    async fn require_session(&self, session_id: &str) -> Result<Session> {
        self.sessions
            .get_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session_id)))
    }

    /// 聊天页：日志快照 + 快捷按钮 + 样例数据与位置图
    async fn chatbot_view(&self, session_id: &str) -> Result<ChatbotView> {
        let session = self.require_session(session_id).await?;
        Ok(ChatbotView {
            messages: session.log.snapshot(),
            quick_queries: quick_query_options(),
            dataset: TableView::from_rows(self.dataset.all().to_vec()),
            map: GeoScatterView::from_rows(self.dataset.all(), MeasurementField::Temperature),
        })
    }

    /// 数据浏览页：闭区间日期过滤 + 按浮标分组的折线图
    async fn explore_view(
        &self,
        session_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        parameter: Option<MeasurementField>,
    ) -> Result<ExploreView> {
        self.require_session(session_id).await?;

        let (default_start, default_end) = default_explore_range();
        let start = start.unwrap_or(default_start);
        let end = end.unwrap_or(default_end);
        let parameter = parameter.unwrap_or(MeasurementField::Salinity);

        let rows = self.dataset.filter_by_date_range(start, end)?;
        let chart = LineChartView::per_float(
            format!("{} over time", parameter.title()),
            &rows,
            parameter,
        );

        Ok(ExploreView {
            start,
            end,
            parameter,
            table: TableView::from_rows(rows),
            chart,
        })
    }

    /// 可视化页：位置图、双指标折线与盐度-温度散点
    fn visualizations_view(&self) -> VisualizationsView {
        let rows = self.dataset.all();
        VisualizationsView {
            map: GeoScatterView::from_rows(rows, MeasurementField::Salinity),
            lines: LineChartView::measurements(rows),
            scatter: ScatterPlotView::salinity_temperature(rows),
        }
    }

    /// 查询历史页：完整日志
    async fn history_view(&self, session_id: &str) -> Result<HistoryView> {
        let session = self.require_session(session_id).await?;
        let entries = session.log.snapshot();
        Ok(HistoryView {
            total: entries.len(),
            entries,
        })
    }

    /// 把快捷查询信号物化成数据面板
    fn materialize(&self, view: QuickView) -> DataPanel {
        match view {
            QuickView::MonthTable { year, month } => {
                DataPanel::Table(TableView::from_rows(self.dataset.filter_by_month(year, month)))
            }
            QuickView::MeasurementSeries(field) => DataPanel::Series(SeriesView::for_field(
                field.to_string(),
                self.dataset.all(),
                field,
            )),
        }
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    async fn handle(&self, session_id: &str, command: Command) -> Result<ViewModel> {
        match command {
            Command::SubmitQuery { role, text } => {
                self.chat.submit_query(session_id, role, &text).await?;
                Ok(ViewModel::Chatbot(self.chatbot_view(session_id).await?))
            }
            Command::QuickQuery { topic } => {
                let reply = self.chat.submit_quick_query(session_id, topic).await?;
                let panel = self.materialize(reply.view);
                Ok(ViewModel::QuickQueryResult(QuickQueryView {
                    reply: reply.message,
                    panel,
                }))
            }
            Command::Navigate { tab } => match tab {
                NavigationTab::Chatbot => {
                    Ok(ViewModel::Chatbot(self.chatbot_view(session_id).await?))
                }
                NavigationTab::ExploreData => Ok(ViewModel::Explore(
                    self.explore_view(session_id, None, None, None).await?,
                )),
                NavigationTab::Visualizations => {
                    self.require_session(session_id).await?;
                    Ok(ViewModel::Visualizations(self.visualizations_view()))
                }
                NavigationTab::QueryHistory => {
                    Ok(ViewModel::History(self.history_view(session_id).await?))
                }
            },
            Command::Explore {
                start,
                end,
                parameter,
            } => Ok(ViewModel::Explore(
                self.explore_view(session_id, start, end, parameter).await?,
            )),
        }
    }
}

/// 数据浏览页的默认日期区间（2023 年 3 月）
fn default_explore_range() -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(2023, 3, 1).expect("valid default start date");
    let end = NaiveDate::from_ymd_opt(2023, 3, 31).expect("valid default end date");
    (start, end)
}

/// 创建仪表盘服务
pub fn create_dashboard_service(
    dataset: Arc<FloatDataset>,
    sessions: Arc<dyn SessionRepository>,
    chat: Arc<dyn ChatService>,
) -> Box<dyn DashboardService> {
    Box::new(DashboardServiceImpl::new(dataset, sessions, chat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::MessageRole;
    use crate::services::chat::create_chat_service;
    use crate::storage::memory::InMemorySessionRepository;

    async fn setup() -> (DashboardServiceImpl, String) {
        let dataset = Arc::new(FloatDataset::sample());
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let chat: Arc<dyn ChatService> = Arc::from(create_chat_service(sessions.clone(), 1000));

        let session = Session::new(UserRole::Student);
        sessions.create(&session).await.unwrap();

        (
            DashboardServiceImpl::new(dataset, sessions, chat),
            session.id,
        )
    }

    #[tokio::test]
    async fn test_submit_query_returns_refreshed_chatbot_view() {
        let (service, session_id) = setup().await;

        let view = service
            .handle(
                &session_id,
                Command::SubmitQuery {
                    role: UserRole::Researcher,
                    text: "show me march data".to_string(),
                },
            )
            .await
            .unwrap();

        let ViewModel::Chatbot(chatbot) = view else {
            panic!("expected chatbot view");
        };
        assert_eq!(chatbot.messages.len(), 2);
        assert_eq!(chatbot.messages[0].role, MessageRole::User);
        assert_eq!(chatbot.messages[1].role, MessageRole::Assistant);
        assert_eq!(chatbot.quick_queries.len(), 3);
        assert_eq!(chatbot.dataset.rows.len(), 5);
        assert_eq!(chatbot.map.color_by, "temperature");
        assert_eq!(chatbot.map.points.len(), 5);
    }

    #[tokio::test]
    async fn test_quick_query_salinity_series_covers_all_rows() {
        let (service, session_id) = setup().await;

        let view = service
            .handle(
                &session_id,
                Command::QuickQuery {
                    topic: QuickQuery::SalinityProfiles,
                },
            )
            .await
            .unwrap();

        let ViewModel::QuickQueryResult(result) = view else {
            panic!("expected quick query result");
        };
        assert_eq!(result.reply.content, "Showing salinity profiles (Demo).");

        let DataPanel::Series(series) = result.panel else {
            panic!("expected series panel");
        };
        assert_eq!(series.name, "salinity");
        assert_eq!(series.points.len(), 5);
        assert_eq!(series.points[0].value, 35.1);
        assert_eq!(series.points[4].value, 34.8);

        // 日志里只多了一条助手消息
        let history = service
            .handle(
                &session_id,
                Command::Navigate {
                    tab: NavigationTab::QueryHistory,
                },
            )
            .await
            .unwrap();
        let ViewModel::History(history) = history else {
            panic!("expected history view");
        };
        assert_eq!(history.total, 1);
        assert_eq!(history.entries[0].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_quick_query_march_floats_table() {
        let (service, session_id) = setup().await;

        let view = service
            .handle(
                &session_id,
                Command::QuickQuery {
                    topic: QuickQuery::FloatsMarch2023,
                },
            )
            .await
            .unwrap();

        let ViewModel::QuickQueryResult(result) = view else {
            panic!("expected quick query result");
        };
        let DataPanel::Table(table) = result.panel else {
            panic!("expected table panel");
        };
        let ids: Vec<_> = table.rows.iter().map(|r| r.float_id.as_str()).collect();
        assert_eq!(ids, vec!["ARGO001", "ARGO002", "ARGO003", "ARGO005"]);
    }

    #[tokio::test]
    async fn test_explore_defaults_to_march_2023_salinity() {
        let (service, session_id) = setup().await;

        let view = service
            .handle(
                &session_id,
                Command::Explore {
                    start: None,
                    end: None,
                    parameter: None,
                },
            )
            .await
            .unwrap();

        let ViewModel::Explore(explore) = view else {
            panic!("expected explore view");
        };
        assert_eq!(explore.start, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert_eq!(explore.end, NaiveDate::from_ymd_opt(2023, 3, 31).unwrap());
        assert_eq!(explore.parameter, MeasurementField::Salinity);
        assert_eq!(explore.table.rows.len(), 4);
        assert_eq!(explore.chart.title.as_deref(), Some("Salinity over time"));
        // 每个浮标一条序列
        assert_eq!(explore.chart.series.len(), 4);
        assert!(explore.chart.series.iter().all(|s| s.points.len() == 1));
    }

    #[tokio::test]
    async fn test_explore_custom_range_and_parameter() {
        let (service, session_id) = setup().await;

        let view = service
            .handle(
                &session_id,
                Command::Explore {
                    start: NaiveDate::from_ymd_opt(2023, 3, 1),
                    end: NaiveDate::from_ymd_opt(2023, 4, 30),
                    parameter: Some(MeasurementField::Temperature),
                },
            )
            .await
            .unwrap();

        let ViewModel::Explore(explore) = view else {
            panic!("expected explore view");
        };
        assert_eq!(explore.table.rows.len(), 5);
        assert_eq!(explore.chart.title.as_deref(), Some("Temperature over time"));
        assert_eq!(explore.chart.series.len(), 5);
    }

    #[tokio::test]
    async fn test_explore_rejects_inverted_range() {
        let (service, session_id) = setup().await;

        let err = service
            .handle(
                &session_id,
                Command::Explore {
                    start: NaiveDate::from_ymd_opt(2023, 4, 1),
                    end: NaiveDate::from_ymd_opt(2023, 3, 1),
                    parameter: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDateRange { .. }));
    }

    #[tokio::test]
    async fn test_visualizations_view_shapes() {
        let (service, session_id) = setup().await;

        let view = service
            .handle(
                &session_id,
                Command::Navigate {
                    tab: NavigationTab::Visualizations,
                },
            )
            .await
            .unwrap();

        let ViewModel::Visualizations(viz) = view else {
            panic!("expected visualizations view");
        };
        assert_eq!(viz.map.color_by, "salinity");
        assert_eq!(viz.map.points.len(), 5);
        assert_eq!(viz.lines.series.len(), 2);
        assert_eq!(viz.lines.series[0].name, "salinity");
        assert_eq!(viz.lines.series[1].name, "temperature");
        assert!(viz.lines.series.iter().all(|s| s.points.len() == 5));
        assert_eq!(viz.scatter.points.len(), 5);
        assert_eq!(viz.scatter.points[0].x, 35.1);
        assert_eq!(viz.scatter.points[0].y, 28.3);
        assert_eq!(viz.scatter.points[0].size, 28.3);
    }

    #[tokio::test]
    async fn test_history_preserves_mixed_message_order() {
        let (service, session_id) = setup().await;

        service
            .handle(
                &session_id,
                Command::SubmitQuery {
                    role: UserRole::Student,
                    text: "first question".to_string(),
                },
            )
            .await
            .unwrap();
        service
            .handle(
                &session_id,
                Command::QuickQuery {
                    topic: QuickQuery::TemperatureTrends,
                },
            )
            .await
            .unwrap();

        let view = service
            .handle(
                &session_id,
                Command::Navigate {
                    tab: NavigationTab::QueryHistory,
                },
            )
            .await
            .unwrap();

        let ViewModel::History(history) = view else {
            panic!("expected history view");
        };
        assert_eq!(history.total, 3);
        assert_eq!(history.entries[0].role, MessageRole::User);
        assert_eq!(history.entries[0].content, "first question");
        assert_eq!(history.entries[1].role, MessageRole::Assistant);
        assert_eq!(
            history.entries[2].content,
            "Showing temperature trends (Demo)."
        );
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected() {
        let (service, _) = setup().await;

        let err = service
            .handle(
                "missing",
                Command::Navigate {
                    tab: NavigationTab::Chatbot,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
