/// Ragdesk centralized constants.
/// All magic numbers, strings, and limits live here.
/// Never hardcode these values elsewhere.

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
    pub const HEALTH_PATH: &str = "/health";
    pub const QUERY_PATH: &str = "/query";
    /// Environment variable that overrides the configured base URL.
    pub const BASE_URL_ENV: &str = "RAGDESK_API_URL";
}

// ─── Sessions ─────────────────────────────────────────────────────────────────

pub mod sessions {
    /// Title every session carries until its first question names it.
    pub const DEFAULT_TITLE: &str = "新對話";
    /// Maximum title length, counted in characters.
    pub const TITLE_MAX_CHARS: usize = 15;
    pub const TITLE_ELLIPSIS: &str = "...";
}

// ─── Answer Content ───────────────────────────────────────────────────────────

pub mod content {
    pub const REASONING_OPEN: &str = "<think>";
    pub const REASONING_CLOSE: &str = "</think>";
}

// ─── Locale ───────────────────────────────────────────────────────────────────

pub mod locale {
    /// Two-digit hour and minute.
    pub const TIMESTAMP_FORMAT: &str = "%H:%M";
    /// `{error}` is replaced with the failure description.
    pub const ERROR_TEMPLATE: &str = "抱歉，系統目前無法回應：{error}";
    pub const ERROR_PLACEHOLDER: &str = "{error}";
    pub const DISCLAIMER: &str = "AI 生成內容僅供參考，正式請假規範請依照公司規章為準";
    pub const SUGGESTED_QUESTIONS: &[&str] = &[
        "事假可以請幾天？",
        "特休假計算方式",
        "加班費計算基準",
        "忘記打卡怎麼補救？",
    ];
}

// ─── Resource Limits ──────────────────────────────────────────────────────────

pub mod limits {
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    pub const HEALTH_TIMEOUT_SECS: u64 = 5;
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "ragdesk";
    pub const CONFIG_FILE: &str = "config.toml";
    pub const SESSIONS_FILE: &str = "chat_sessions.json";
}
