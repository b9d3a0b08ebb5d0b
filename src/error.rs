use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
///
/// 守卫对所有状态一视同仁（重定向到登录页），
/// 区分状态只用于日志与调用方的提示信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateErrorStatus {
    /// 预期的存储中没有令牌
    MissingCredential,
    /// 服务端拒绝：非 2xx，或 payload 中 status 不是 "success"
    Rejected,
    /// HTTP 客户端本身失败（网络错误、请求构建失败）
    Transport,
    /// 响应体 JSON 解析失败
    Serialization,
    /// Cookie / LocalStorage 写入失败
    Storage,
    /// 调用方输入不合法（空凭据、不支持的操作）
    InvalidInput,
}

impl GateErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            GateErrorStatus::MissingCredential => "MISSING_CREDENTIAL",
            GateErrorStatus::Rejected => "VERIFICATION_REJECTED",
            GateErrorStatus::Transport => "TRANSPORT_ERROR",
            GateErrorStatus::Serialization => "JSON_PARSE_ERROR",
            GateErrorStatus::Storage => "STORAGE_ERROR",
            GateErrorStatus::InvalidInput => "INVALID_INPUT",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSpan {
    /// 操作名称，如 "guard.verify", "session.verify_login"
    pub operation: String,
    /// 额外的细节信息，如守卫名称、端点 URL
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 会话门控层的领域错误
///
/// - status: 错误类型/语义
/// - message: 错误消息
/// - source: 原始错误（可选，用于错误链）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct GateError {
    pub status: GateErrorStatus,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl GateError {
    pub fn new(status: GateErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::MissingCredential, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::Rejected, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::Transport, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::Serialization, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::Storage, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::InvalidInput, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for GateError {
    fn from(e: serde_json::Error) -> Self {
        GateError::serialization(e.to_string()).with_source(e)
    }
}

pub type GateResult<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_includes_trace() {
        let err = GateError::rejected("verify returned status 401")
            .in_op_with("guard.verify", "admin")
            .in_op("guard.mount");

        assert_eq!(
            err.to_string(),
            "[VERIFICATION_REJECTED] verify returned status 401 | trace: guard.verify(admin) -> guard.mount"
        );
    }

    #[test]
    fn display_without_spans() {
        let err = GateError::missing_credential("no AdminToken cookie");
        assert_eq!(err.to_string(), "[MISSING_CREDENTIAL] no AdminToken cookie");
        assert!(err.spans().is_empty());
    }

    #[test]
    fn serde_errors_keep_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = GateError::from(parse);

        assert_eq!(err.status, GateErrorStatus::Serialization);
        assert!(err.source().is_some());
    }
}
