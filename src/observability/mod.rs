//! 可观测性模块
//!
//! 提供 Prometheus 文本格式指标、结构化日志和健康检查。

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::config::LoggingConfig;

// ===== Metrics =====

/// 进程内应用指标，原子计数器实现
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub http_request_duration_sum: Arc<AtomicU64>,
    pub active_connections: Arc<AtomicUsize>,
    pub sessions_active: Arc<AtomicUsize>,
    pub messages_total: Arc<AtomicU64>,
    pub queries_total: Arc<AtomicU64>,
    pub quick_queries_total: Arc<AtomicU64>,
    pub exports_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录一次 HTTP 请求及其耗时
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// 记录活跃连接变化
    pub fn record_connection(&self, delta: isize) {
        adjust_gauge(&self.active_connections, delta);
    }

    /// 记录活跃会话变化
    pub fn record_session(&self, delta: isize) {
        adjust_gauge(&self.sessions_active, delta);
    }

    /// 记录写入日志的消息数
    pub fn record_messages(&self, count: u64) {
        self.messages_total.fetch_add(count, Ordering::SeqCst);
    }

    /// 记录自由文本查询
    pub fn record_query(&self) {
        self.queries_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录快捷查询
    pub fn record_quick_query(&self) {
        self.quick_queries_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录 CSV 导出
    pub fn record_export(&self) {
        self.exports_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 文本格式指标
    pub fn gather(&self) -> String {
        use std::fmt::Write;

        fn metric(out: &mut String, name: &str, kind: &str, help: &str, value: u64) {
            let _ = writeln!(out, "# HELP {name} {help}");
            let _ = writeln!(out, "# TYPE {name} {kind}");
            let _ = writeln!(out, "{name} {value}");
        }

        let requests = self.http_requests_total.load(Ordering::SeqCst);
        let mut out = String::with_capacity(1024);

        metric(
            &mut out,
            "http_requests_total",
            "counter",
            "Total HTTP requests",
            requests,
        );
        let _ = writeln!(
            out,
            "# HELP http_request_duration_seconds HTTP request duration in seconds"
        );
        let _ = writeln!(out, "# TYPE http_request_duration_seconds histogram");
        let _ = writeln!(
            out,
            "http_request_duration_seconds_sum {}",
            self.http_request_duration_sum.load(Ordering::SeqCst) as f64 / 1000.0
        );
        let _ = writeln!(out, "http_request_duration_seconds_count {requests}");
        metric(
            &mut out,
            "active_connections",
            "gauge",
            "Active HTTP connections",
            self.active_connections.load(Ordering::SeqCst) as u64,
        );
        metric(
            &mut out,
            "sessions_active",
            "gauge",
            "Active sessions",
            self.sessions_active.load(Ordering::SeqCst) as u64,
        );
        metric(
            &mut out,
            "messages_total",
            "counter",
            "Total chat messages appended",
            self.messages_total.load(Ordering::SeqCst),
        );
        metric(
            &mut out,
            "queries_total",
            "counter",
            "Total free-text queries",
            self.queries_total.load(Ordering::SeqCst),
        );
        metric(
            &mut out,
            "quick_queries_total",
            "counter",
            "Total quick queries",
            self.quick_queries_total.load(Ordering::SeqCst),
        );
        metric(
            &mut out,
            "exports_total",
            "counter",
            "Total CSV exports",
            self.exports_total.load(Ordering::SeqCst),
        );
        metric(
            &mut out,
            "errors_total",
            "counter",
            "Total error responses",
            self.errors_total.load(Ordering::SeqCst),
        );

        out
    }
}

fn adjust_gauge(gauge: &AtomicUsize, delta: isize) {
    if delta >= 0 {
        gauge.fetch_add(delta as usize, Ordering::SeqCst);
    } else {
        gauge.fetch_sub(delta.unsigned_abs(), Ordering::SeqCst);
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// 单个健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}

/// 健康检查结果
#[derive(Clone)]
pub struct HealthCheckResult {
    pub name: String,
    pub healthy: bool,
    pub message: String,
    pub latency_ms: u64,
}

fn verdict(healthy: bool) -> &'static str {
    if healthy { "healthy" } else { "unhealthy" }
}

/// 健康检查与指标的共享状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub health_checks: Arc<Mutex<Vec<HealthCheckResult>>>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String) -> Self {
        Self {
            metrics: Arc::new(AppMetrics::default()),
            health_checks: Arc::new(Mutex::new(Vec::new())),
            start_time: Utc::now(),
            version,
        }
    }

    /// 添加健康检查结果，最多保留最近 10 条
    pub async fn add_health_check(&self, result: HealthCheckResult) {
        let mut checks = self.health_checks.lock().await;
        while checks.len() >= 10 {
            checks.remove(0);
        }
        checks.push(result);
    }

    /// 所有检查项是否健康
    pub async fn all_healthy(&self) -> bool {
        self.health_checks.lock().await.iter().all(|c| c.healthy)
    }

    /// 汇总当前健康状态
    pub async fn health_status(&self) -> (bool, HealthStatus) {
        let checks = self.health_checks.lock().await;
        let all_healthy = checks.iter().all(|c| c.healthy);

        let status = HealthStatus {
            status: verdict(all_healthy).to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: self.version.clone(),
            uptime_seconds: self.uptime_seconds(),
            checks: checks
                .iter()
                .map(|c| HealthCheck {
                    name: c.name.clone(),
                    status: verdict(c.healthy).to_string(),
                    message: Some(c.message.clone()),
                    latency_ms: Some(c.latency_ms),
                })
                .collect(),
        };

        (all_healthy, status)
    }

    /// 自进程启动以来的秒数
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

// ===== Health Check Handlers =====

/// 完整健康状态端点
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let (all_healthy, status) = state.health_status().await;
    let code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查
pub async fn readiness(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    if state.all_healthy().await {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
    }
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    state.metrics.gather()
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化 tracing 日志栈
///
/// 配置了日志目录时按天滚动写文件，并返回后台写线程的守卫，
/// 调用方需要持有守卫直到进程退出。
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let mut guard = None;
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "floatchat.log");
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            if config.structured {
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
                    .boxed()
            } else {
                fmt::layer().with_writer(writer).with_ansi(false).boxed()
            }
        }
        None => {
            if config.structured {
                fmt::layer().json().boxed()
            } else {
                fmt::layer().with_target(true).with_line_number(true).boxed()
            }
        }
    };

    // fmt_layer 只实现 Layer<Registry>，必须先挂在 registry 上，过滤器在外层
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    guard
}

// ===== Request Metrics Middleware =====

/// 请求计数与耗时统计中间件
pub async fn metrics_middleware(
    State(state): State<Arc<ObservabilityState>>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let start = std::time::Instant::now();
    state.metrics.record_connection(1);

    let response = next.run(req).await;

    state
        .metrics
        .record_http_request(start.elapsed().as_millis() as u64);
    if response.status().is_client_error() || response.status().is_server_error() {
        state.metrics.record_error();
    }
    state.metrics.record_connection(-1);

    response
}
