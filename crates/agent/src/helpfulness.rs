//! Detecting answers that admit they cannot help

/// Decides whether a generated answer failed to help the user
pub trait HelpfulnessJudge: Send + Sync {
    fn is_unhelpful(&self, answer: &str) -> bool;
}

/// Default markers, English and Arabic
const DEFAULT_MARKERS: &[&str] = &[
    "don't know",
    "don't have",
    "cannot answer",
    "can't answer",
    "no information",
    "not sure",
    "unable to",
    "sorry",
    "لا أعرف",
    "لا أملك",
    "لا يمكنني",
    "عذراً",
];

/// Case-insensitive substring scan for "I don't know"-shaped phrases
#[derive(Debug, Clone)]
pub struct PhraseMarkerJudge {
    markers: Vec<String>,
}

impl PhraseMarkerJudge {
    pub fn new() -> Self {
        Self::with_markers(DEFAULT_MARKERS.iter().copied())
    }

    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.into().to_lowercase())
                .collect(),
        }
    }
}

impl Default for PhraseMarkerJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpfulnessJudge for PhraseMarkerJudge {
    fn is_unhelpful(&self, answer: &str) -> bool {
        // typographic apostrophes are common in model output
        let answer = answer.to_lowercase().replace('\u{2019}', "'");
        self.markers.iter().any(|m| answer.contains(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let judge = PhraseMarkerJudge::new();
        assert!(judge.is_unhelpful("I'm sorry, I don't have that information."));
        assert!(judge.is_unhelpful("I DON’T KNOW the answer to that."));
        assert!(judge.is_unhelpful("عذراً، لا أملك هذه المعلومة"));
        assert!(!judge.is_unhelpful("We are open 9am-5pm, Monday to Friday."));
    }

    #[test]
    fn test_custom_markers() {
        let judge = PhraseMarkerJudge::with_markers(["Out of scope"]);
        assert!(judge.is_unhelpful("That is out of scope for me."));
        assert!(!judge.is_unhelpful("Sorry, closed today."));
    }
}
