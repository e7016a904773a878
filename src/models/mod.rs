//! 核心数据模型模块
//!
//! 定义 FloatChat 的核心数据结构：FloatObservation, ChatMessage, Session 等。

pub mod conversation;
pub mod observation;
pub mod session;

pub use conversation::*;
pub use observation::*;
pub use session::*;
