use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub level: String,
    pub category: String,
    pub question_type: String,
    pub points: i32,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub hints: Option<Json<Vec<String>>>,
    pub tags: Option<Json<Vec<String>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Junior,
    Middle,
    Senior,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Junior, Level::Middle, Level::Senior];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Junior => "junior",
            Level::Middle => "middle",
            Level::Senior => "senior",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Junior => "Junior",
            Level::Middle => "Middle",
            Level::Senior => "Senior",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown level '{}'", s))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SystemDesign,
    Algorithms,
    Databases,
    Networking,
    Security,
    Backend,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::SystemDesign,
        Category::Algorithms,
        Category::Databases,
        Category::Networking,
        Category::Security,
        Category::Backend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SystemDesign => "system_design",
            Category::Algorithms => "algorithms",
            Category::Databases => "databases",
            Category::Networking => "networking",
            Category::Security => "security",
            Category::Backend => "backend",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::SystemDesign => "System Design",
            Category::Algorithms => "Algorithms & Data Structures",
            Category::Databases => "Databases",
            Category::Networking => "Networking",
            Category::Security => "Security",
            Category::Backend => "Backend Development",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_and_categories_parse_their_wire_names() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("lead".parse::<Level>().is_err());
        assert!("frontend".parse::<Category>().is_err());
    }
}
