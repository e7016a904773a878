//! 服务模块

pub mod chat;
pub mod dashboard;
pub mod session;

pub use chat::{ChatExchange, ChatService, QuickReply, QuickView, create_chat_service};
pub use dashboard::{Command, DashboardService, NavigationTab, create_dashboard_service};
pub use session::{Pagination, SessionQuery, SessionService, create_session_service};
