//! Who is asking, and from where.

use axum::http::HeaderMap;
use hrms_authz::{resolve_role, Role};
use hrms_common_core::{CompanyId, UserId};
use serde::{Deserialize, Serialize};

/// The authenticated caller, placed in request extensions by the
/// authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    /// Role as issued by the identity provider; resolved on every check.
    pub role: String,
    pub company_id: Option<CompanyId>,
}

impl Principal {
    pub fn new(user_id: impl Into<UserId>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
            company_id: None,
        }
    }

    pub fn with_company(mut self, company: impl Into<CompanyId>) -> Self {
        self.company_id = Some(company.into());
        self
    }

    /// The recognized role, if any.
    pub fn resolved_role(&self) -> Option<Role> {
        resolve_role(&self.role)
    }
}

/// Request metadata copied onto audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestOrigin {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }

    /// First `X-Forwarded-For` hop (or `X-Real-IP`) and `User-Agent`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .filter(|ip| !ip.is_empty())
            .or_else(|| header("x-real-ip"));

        Self {
            ip_address,
            user_agent: header("user-agent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_resolved_role() {
        assert_eq!(Principal::new("u1", "HR").resolved_role(), Some(Role::HrManager));
        assert_eq!(Principal::new("u1", "ADMIN ").resolved_role(), None);
    }

    #[test]
    fn test_origin_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.5, 10.0.0.1"));
        headers.insert("user-agent", HeaderValue::from_static("hrms-web/2.1"));

        let origin = RequestOrigin::from_headers(&headers);
        assert_eq!(origin.ip_address.as_deref(), Some("203.0.113.5"));
        assert_eq!(origin.user_agent.as_deref(), Some("hrms-web/2.1"));
    }

    #[test]
    fn test_origin_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        let origin = RequestOrigin::from_headers(&headers);
        assert_eq!(origin.ip_address.as_deref(), Some("198.51.100.7"));
        assert_eq!(origin.user_agent, None);
    }
}
