use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Lead phrases match in any case; the captured name must be capitalized.
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?i:my name is)\s+([A-Z][a-zA-Z\-']{1,39})\b",
        r"\b(?i:I am)\s+([A-Z][a-zA-Z\-']{1,39})\b",
        r"\b(?i:I'm)\s+([A-Z][a-zA-Z\-']{1,39})\b",
        r"\b(?i:this is)\s+([A-Z][a-zA-Z\-']{1,39})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static AGE_YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*(?:years old|yrs|yo)\b").unwrap());
static AGE_I_AM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bI am\s+(\d{1,2})\b").unwrap());

static SCHOOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bschool\b").unwrap());
static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bclass\s*\d{1,2}\b|\bclass\s+[a-z0-9]+\b").unwrap());
static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsection\b").unwrap());
static GRADE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(grade|std|standard)\b").unwrap());

static FAMILY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(family|mother|father|sister|brother|parents)\b").unwrap()
});
static HOBBY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(hobby|hobbies|enjoy|like|love|playing|play|reading|drawing|singing|dancing|cricket|football|painting|coding)\b",
    )
    .unwrap()
});
static GOAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(goal|aim|want to be|aspire|dream)\b").unwrap());
static FUN_FACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(fun fact|one thing people|people don't know|secret)\b").unwrap()
});

static SALUTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(hello|hi|good morning|good evening|hey everyone|hello everyone)\b").unwrap()
});
static CLOSING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(thank you|thanks for listening|thank you for listening|thanks)\b").unwrap()
});

/// Speaker's name from the first matching introduction phrase.
pub fn detect_name(transcript: &str) -> Option<String> {
    NAME_PATTERNS
        .iter()
        .find_map(|re| re.captures(transcript))
        .map(|caps| caps[1].to_string())
}

/// Explicit age: "13 years old", "13yo", else "I am 13".
pub fn detect_age(transcript: &str) -> Option<u32> {
    AGE_YEARS_RE
        .captures(transcript)
        .or_else(|| AGE_I_AM_RE.captures(transcript))
        .and_then(|caps| caps[1].parse().ok())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchoolClassFindings {
    pub school: bool,
    pub class: bool,
    pub section: bool,
    pub grade: bool,
}

impl SchoolClassFindings {
    pub fn any(&self) -> bool {
        self.school || self.class || self.section || self.grade
    }
}

pub fn detect_school_class(transcript: &str) -> SchoolClassFindings {
    SchoolClassFindings {
        school: SCHOOL_RE.is_match(transcript),
        class: CLASS_RE.is_match(transcript),
        section: SECTION_RE.is_match(transcript),
        grade: GRADE_RE.is_match(transcript),
    }
}

pub fn detect_family(transcript: &str) -> bool {
    FAMILY_RE.is_match(transcript)
}

pub fn detect_hobbies(transcript: &str) -> bool {
    HOBBY_RE.is_match(transcript)
}

pub fn detect_goal(transcript: &str) -> bool {
    GOAL_RE.is_match(transcript)
}

pub fn detect_fun_fact(transcript: &str) -> bool {
    FUN_FACT_RE.is_match(transcript)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SalutationClosing {
    pub salutation: bool,
    pub closing: bool,
}

pub fn detect_salutation_and_closing(transcript: &str) -> SalutationClosing {
    SalutationClosing {
        salutation: SALUTATION_RE.is_match(transcript),
        closing: CLOSING_RE.is_match(transcript),
    }
}

/// Presence of each rubric keyword category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeywordFindings {
    pub name: bool,
    pub age: bool,
    pub school_or_class: bool,
    pub family: bool,
    pub hobbies: bool,
    pub goal: bool,
    pub fun_fact: bool,
}

impl KeywordFindings {
    /// Must-have categories: name, school/class, family, hobbies.
    pub fn must_have(&self) -> [bool; 4] {
        [self.name, self.school_or_class, self.family, self.hobbies]
    }

    /// Bonus categories: age, goal, fun fact.
    pub fn bonus(&self) -> [bool; 3] {
        [self.age, self.goal, self.fun_fact]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlowFindings {
    pub intro: bool,
    pub body: bool,
    pub closing: bool,
}

/// Intro: name or any school/class signal. Body: hobbies, family or a fun
/// fact. Closing: a thanks phrase.
pub fn detect_flow(transcript: &str) -> FlowFindings {
    Detections::run(transcript).flow
}

/// Results of every detector over one transcript.
///
/// Every detector runs even when an earlier one already settles a category,
/// so the evidence is always complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detections {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub school_class: SchoolClassFindings,
    pub family: bool,
    pub hobbies: bool,
    pub goal: bool,
    pub fun_fact: bool,
    pub salutation: SalutationClosing,
    pub keywords: KeywordFindings,
    pub flow: FlowFindings,
}

impl Detections {
    pub fn run(transcript: &str) -> Self {
        let name = detect_name(transcript);
        let age = detect_age(transcript);
        let school_class = detect_school_class(transcript);
        let family = detect_family(transcript);
        let hobbies = detect_hobbies(transcript);
        let goal = detect_goal(transcript);
        let fun_fact = detect_fun_fact(transcript);
        let salutation = detect_salutation_and_closing(transcript);

        let keywords = KeywordFindings {
            name: name.is_some(),
            // An age of 0 does not count as stated
            age: age.is_some_and(|a| a > 0),
            school_or_class: school_class.any(),
            family,
            hobbies,
            goal,
            fun_fact,
        };

        let flow = FlowFindings {
            intro: keywords.name || keywords.school_or_class,
            body: hobbies || family || fun_fact,
            closing: salutation.closing,
        };

        Self {
            name,
            age,
            school_class,
            family,
            hobbies,
            goal,
            fun_fact,
            salutation,
            keywords,
            flow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_name_my_name_is() {
        assert_eq!(detect_name("My name is Ravi."), Some("Ravi".to_string()));
    }

    #[test]
    fn test_detect_name_pattern_order() {
        // "my name is" wins over the earlier "I am"
        let text = "I am Happy to be here, my name is Priya";
        assert_eq!(detect_name(text), Some("Priya".to_string()));
    }

    #[test]
    fn test_detect_name_alternatives() {
        assert_eq!(detect_name("hi, I'm Anya-Rose"), Some("Anya-Rose".to_string()));
        assert_eq!(detect_name("this is Karan speaking"), Some("Karan".to_string()));
    }

    #[test]
    fn test_detect_name_requires_capital() {
        assert_eq!(detect_name("my name is ravi"), None);
        assert_eq!(detect_name("I am 13 years old"), None);
    }

    #[test]
    fn test_detect_name_too_long() {
        let long = format!("My name is {}", "A".repeat(45));
        assert_eq!(detect_name(&long), None);
    }

    #[test]
    fn test_detect_age() {
        assert_eq!(detect_age("I am 13 years old"), Some(13));
        assert_eq!(detect_age("she is 9yrs"), Some(9));
        assert_eq!(detect_age("I am 12 and I like cricket"), Some(12));
        assert_eq!(detect_age("I am in class 9"), None);
    }

    #[test]
    fn test_detect_age_prefers_years_old() {
        assert_eq!(detect_age("I am 5 feet tall and 14 years old"), Some(14));
    }

    #[test]
    fn test_detect_school_class() {
        let found = detect_school_class("I study in class 9 at ABC School");
        assert!(found.school);
        assert!(found.class);
        assert!(!found.section);
        assert!(!found.grade);

        let found = detect_school_class("I am in grade 7, section B");
        assert!(found.section);
        assert!(found.grade);
        assert!(!found.school);
        assert!(found.any());
    }

    #[test]
    fn test_keyword_vocabulary() {
        assert!(detect_family("I live with my Parents"));
        assert!(!detect_family("I live alone"));
        assert!(detect_hobbies("I enjoy painting"));
        assert!(detect_goal("I want to be a doctor"));
        assert!(detect_fun_fact("A fun fact about me"));
        assert!(detect_fun_fact("people don't know that I juggle"));
        assert!(!detect_goal("nothing here"));
    }

    #[test]
    fn test_salutation_and_closing() {
        let found = detect_salutation_and_closing("Hello everyone, thank you for listening");
        assert_eq!(
            found,
            SalutationClosing {
                salutation: true,
                closing: true
            }
        );

        let found = detect_salutation_and_closing("Which is my favourite");
        assert!(!found.salutation);
        assert!(!found.closing);
    }

    #[test]
    fn test_flow() {
        let flow = detect_flow("My name is Ravi. I love football. Thanks!");
        assert!(flow.intro);
        assert!(flow.body);
        assert!(flow.closing);

        let flow = detect_flow("I study at a school.");
        assert!(flow.intro);
        assert!(!flow.body);
        assert!(!flow.closing);
    }

    #[test]
    fn test_detections_run_everything() {
        let d = Detections::run(
            "Good morning. My name is Ravi, I am 13 years old. My secret dream is to fly.",
        );
        assert_eq!(d.name.as_deref(), Some("Ravi"));
        assert_eq!(d.age, Some(13));
        assert!(d.keywords.goal);
        assert!(d.keywords.fun_fact);
        assert!(d.salutation.salutation);
        assert!(!d.keywords.family);
        // fun fact alone is enough for a body
        assert!(d.flow.body);
    }
}
