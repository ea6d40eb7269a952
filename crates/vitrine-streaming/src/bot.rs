//! Automation detection for the completion policy.

/// Decides whether a requester is an automated crawler. The streaming
/// controller only needs the boolean; keeping the heuristic behind this
/// trait keeps its accuracy a maintenance concern of the integrator,
/// not of the control flow.
pub trait AutomationClassifier: Send + Sync {
    fn is_automated(&self, user_agent: Option<&str>) -> bool;
}

/// Any boolean-valued function over the user-agent works as a
/// classifier.
impl<F> AutomationClassifier for F
where
    F: Fn(Option<&str>) -> bool + Send + Sync,
{
    fn is_automated(&self, user_agent: Option<&str>) -> bool {
        self(user_agent)
    }
}

/// Substring-signature classifier over known crawler user-agents.
///
/// The list is deliberately short; misclassifying a human as a crawler
/// only costs them progressive rendering, never the page.
#[derive(Debug, Clone)]
pub struct KnownCrawlers {
    signatures: Vec<String>,
}

const DEFAULT_SIGNATURES: &[&str] = &[
    "googlebot",
    "bingbot",
    "yandexbot",
    "duckduckbot",
    "baiduspider",
    "slurp",
    "applebot",
    "petalbot",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
    "headlesschrome",
    "crawler",
    "spider",
];

impl KnownCrawlers {
    /// The default signature set.
    pub fn new() -> Self {
        Self {
            signatures: DEFAULT_SIGNATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add a signature (matched case-insensitively as a substring).
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signatures.push(signature.into().to_lowercase());
        self
    }
}

impl Default for KnownCrawlers {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomationClassifier for KnownCrawlers {
    fn is_automated(&self, user_agent: Option<&str>) -> bool {
        let Some(agent) = user_agent else {
            return false;
        };
        let agent = agent.to_lowercase();
        self.signatures.iter().any(|sig| agent.contains(sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_crawlers_match() {
        let crawlers = KnownCrawlers::new();
        assert!(crawlers.is_automated(Some(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
        )));
        assert!(crawlers.is_automated(Some("Mozilla/5.0 (compatible; bingbot/2.0)")));
    }

    #[test]
    fn test_browsers_do_not_match() {
        let crawlers = KnownCrawlers::new();
        assert!(!crawlers.is_automated(Some(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
        )));
        assert!(!crawlers.is_automated(None));
    }

    #[test]
    fn test_custom_signature() {
        let crawlers = KnownCrawlers::new().with_signature("AcmeMonitor");
        assert!(crawlers.is_automated(Some("AcmeMonitor/1.0 uptime checks")));
    }

    #[test]
    fn test_closures_are_classifiers() {
        let always = |_: Option<&str>| true;
        assert!(always.is_automated(None));
    }
}
