//! Curated technology keyword set used for matched/missing analysis and
//! skill extraction. Kept deliberately small and flat; recall comes from
//! tokenization (e.g. "asp.net" is one token so it is one keyword here).

use std::collections::HashSet;
use std::sync::OnceLock;

const TECH_KEYWORDS: &[&str] = &[
    "csharp", "c#", "dotnet", ".net", "net", "aspnet", "asp.net",
    "python", "java", "javascript", "typescript", "react", "angular", "vue",
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch",
    "docker", "kubernetes", "azure", "aws", "gcp", "git", "github", "gitlab",
    "html", "css", "bootstrap", "jquery", "nodejs", "express",
    "jwt", "oauth", "rest", "api", "microservices", "mvc",
    "entity", "framework", "linq", "ef", "efcore",
    "machine", "learning", "ml", "ai", "nlp", "tensorflow", "pytorch",
    "agile", "scrum", "devops", "cicd", "jenkins", "linux", "ubuntu",
    "oop", "solid", "design", "patterns", "clean", "architecture",
];

/// Lookup set for the keyword inventory. Tokens compared against this set
/// are already lowercase, so membership is effectively case-insensitive.
pub fn tech_keyword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| TECH_KEYWORDS.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_contains_symbolic_entries() {
        let set = tech_keyword_set();
        assert!(set.contains("c#"));
        assert!(set.contains(".net"));
        assert!(set.contains("asp.net"));
    }

    #[test]
    fn set_has_no_duplicates() {
        assert_eq!(tech_keyword_set().len(), TECH_KEYWORDS.len());
    }
}
