use serde::{Deserialize, Serialize};

use crate::domain::stone::StoneCut;
use crate::errors::DomainError;

/// Canonical quiz content: four questions, five options each, every option
/// tagged with the personality it counts toward.
const QUESTION_SPECS: &[QuestionSpec] = &[
    QuestionSpec {
        id: 1,
        question: "Which describes your partner's style best?",
        options: &[
            ("Timeless and elegant", "classic"),
            ("Bold and glamorous", "glamorous"),
            ("Romantic and dreamy", "romantic"),
            ("Sleek and modern", "modern"),
            ("Creative and artistic", "artistic"),
        ],
    },
    QuestionSpec {
        id: 2,
        question: "What's their ideal vacation?",
        options: &[
            ("A classic European city tour", "classic"),
            ("A luxury resort in the Maldives", "glamorous"),
            ("A cozy cabin in the mountains", "romantic"),
            ("A design-forward city like Tokyo", "modern"),
            ("An art retreat in Tuscany", "artistic"),
        ],
    },
    QuestionSpec {
        id: 3,
        question: "Their jewelry box mainly contains:",
        options: &[
            ("A few timeless, quality pieces", "classic"),
            ("Statement pieces that sparkle", "glamorous"),
            ("Delicate, meaningful pieces", "romantic"),
            ("Minimalist, geometric designs", "modern"),
            ("Unique, handcrafted items", "artistic"),
        ],
    },
    QuestionSpec {
        id: 4,
        question: "They prefer flowers that are:",
        options: &[
            ("Classic red roses", "classic"),
            ("Exotic orchids", "glamorous"),
            ("Soft peonies", "romantic"),
            ("Architectural succulents", "modern"),
            ("Wildflower bouquets", "artistic"),
        ],
    },
];

/// Recommendation per personality. The classic entry leads the table and
/// doubles as the fallback for tags outside it.
const RECOMMENDATION_SPECS: &[RecommendationSpec] = &[
    RecommendationSpec {
        personality: "classic",
        stone: StoneCut::Round,
        setting: "solitaire",
        metal: "white-gold",
        description: "Timeless elegance that never goes out of style",
    },
    RecommendationSpec {
        personality: "glamorous",
        stone: StoneCut::Oval,
        setting: "halo",
        metal: "white-gold",
        description: "Maximum sparkle for someone who loves to shine",
    },
    RecommendationSpec {
        personality: "romantic",
        stone: StoneCut::Cushion,
        setting: "vintage",
        metal: "rose-gold",
        description: "Soft, dreamy details with old-world charm",
    },
    RecommendationSpec {
        personality: "modern",
        stone: StoneCut::Princess,
        setting: "tension",
        metal: "platinum",
        description: "Clean lines and contemporary sophistication",
    },
    RecommendationSpec {
        personality: "artistic",
        stone: StoneCut::Pear,
        setting: "three-stone",
        metal: "yellow-gold",
        description: "A distinctive look for a one-of-a-kind person",
    },
];

#[derive(Clone, Copy, Debug)]
struct QuestionSpec {
    id: u32,
    question: &'static str,
    options: &'static [(&'static str, &'static str)],
}

#[derive(Clone, Copy, Debug)]
struct RecommendationSpec {
    personality: &'static str,
    stone: StoneCut,
    setting: &'static str,
    metal: &'static str,
    description: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
    pub personality: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<QuizOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityRecommendation {
    pub stone: StoneCut,
    pub setting: String,
    pub metal: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizAnalysis {
    pub personality: String,
    pub recommendation: PersonalityRecommendation,
    pub confidence: f64,
}

/// The fixed, ordered question list served to every shopper.
pub fn quiz_questions() -> Vec<QuizQuestion> {
    QUESTION_SPECS
        .iter()
        .map(|spec| QuizQuestion {
            id: spec.id,
            question: spec.question.to_string(),
            options: spec
                .options
                .iter()
                .map(|(text, personality)| QuizOption {
                    text: text.to_string(),
                    personality: personality.to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Tally the chosen personality tags and map the dominant one to a
/// recommendation.
///
/// The dominant tag is the one with the strictly highest count; on a tie the
/// tag whose first occurrence came earliest in `answers` wins, which keeps the
/// result deterministic for any answer order. Confidence is the dominant
/// share of all answers.
pub fn analyze(answers: &[String]) -> Result<QuizAnalysis, DomainError> {
    if answers.is_empty() {
        return Err(DomainError::EmptyAnswers);
    }

    // Tally in first-occurrence order so the tie-break below is stable.
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for answer in answers {
        match tally.iter_mut().find(|(tag, _)| *tag == answer.as_str()) {
            Some((_, count)) => *count += 1,
            None => tally.push((answer.as_str(), 1)),
        }
    }

    let mut dominant = tally[0];
    for entry in &tally[1..] {
        if entry.1 > dominant.1 {
            dominant = *entry;
        }
    }

    let (personality, count) = dominant;
    let spec = recommendation_spec(personality);

    Ok(QuizAnalysis {
        personality: personality.to_string(),
        recommendation: PersonalityRecommendation {
            stone: spec.stone,
            setting: spec.setting.to_string(),
            metal: spec.metal.to_string(),
            description: spec.description.to_string(),
        },
        confidence: count as f64 / answers.len() as f64,
    })
}

fn recommendation_spec(personality: &str) -> &'static RecommendationSpec {
    RECOMMENDATION_SPECS
        .iter()
        .find(|spec| spec.personality == personality)
        .unwrap_or(&RECOMMENDATION_SPECS[0])
}
