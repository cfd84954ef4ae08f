use serde::{Deserialize, Serialize};

use crate::models::agenda_item::LangMap;

/// Lifecycle of a citizen-reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Reported,
    PickedInAgenda,
    DiscussedInGramSabha,
    Transferred,
    Resolved,
    NoActionNeeded,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Reported => "REPORTED",
            IssueStatus::PickedInAgenda => "PICKED_IN_AGENDA",
            IssueStatus::DiscussedInGramSabha => "DISCUSSED_IN_GRAM_SABHA",
            IssueStatus::Transferred => "TRANSFERRED",
            IssueStatus::Resolved => "RESOLVED",
            IssueStatus::NoActionNeeded => "NO_ACTION_NEEDED",
        }
    }

    pub fn parse(s: &str) -> Option<IssueStatus> {
        match s {
            "REPORTED" => Some(IssueStatus::Reported),
            "PICKED_IN_AGENDA" => Some(IssueStatus::PickedInAgenda),
            "DISCUSSED_IN_GRAM_SABHA" => Some(IssueStatus::DiscussedInGramSabha),
            "TRANSFERRED" => Some(IssueStatus::Transferred),
            "RESOLVED" => Some(IssueStatus::Resolved),
            "NO_ACTION_NEEDED" => Some(IssueStatus::NoActionNeeded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Urgent,
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "URGENT",
            Priority::Normal => "NORMAL",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "URGENT" => Some(Priority::Urgent),
            "NORMAL" => Some(Priority::Normal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    CultureAndNature,
    Infrastructure,
    EarningOpportunities,
    BasicAmenities,
    SocialWelfareSchemes,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CultureAndNature => "CULTURE_AND_NATURE",
            Category::Infrastructure => "INFRASTRUCTURE",
            Category::EarningOpportunities => "EARNING_OPPORTUNITIES",
            Category::BasicAmenities => "BASIC_AMENITIES",
            Category::SocialWelfareSchemes => "SOCIAL_WELFARE_SCHEMES",
            Category::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "CULTURE_AND_NATURE" => Some(Category::CultureAndNature),
            "INFRASTRUCTURE" => Some(Category::Infrastructure),
            "EARNING_OPPORTUNITIES" => Some(Category::EarningOpportunities),
            "BASIC_AMENITIES" => Some(Category::BasicAmenities),
            "SOCIAL_WELFARE_SCHEMES" => Some(Category::SocialWelfareSchemes),
            "OTHER" => Some(Category::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Subcategory {
    // Culture and nature
    Festivals,
    TreesAndForests,
    Soil,
    NaturalWaterResources,
    ReligiousPlaces,
    // Infrastructure
    Land,
    Water,
    Energy,
    Transportation,
    Communication,
    // Earning opportunities
    Agriculture,
    AnimalHusbandry,
    Fisheries,
    SmallScaleIndustries,
    MinorForestProduce,
    KhadiAndVillageIndustries,
    // Basic amenities
    Health,
    Education,
    HousingAndSanitation,
    SportsAndEntertainment,
    Food,
    // Social welfare schemes
    WeakerSections,
    HandicappedWelfare,
    FamilyWelfare,
    WomenAndChildDevelopment,
    PovertyAlleviation,
    Other,
}

impl Subcategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcategory::Festivals => "FESTIVALS",
            Subcategory::TreesAndForests => "TREES_AND_FORESTS",
            Subcategory::Soil => "SOIL",
            Subcategory::NaturalWaterResources => "NATURAL_WATER_RESOURCES",
            Subcategory::ReligiousPlaces => "RELIGIOUS_PLACES",
            Subcategory::Land => "LAND",
            Subcategory::Water => "WATER",
            Subcategory::Energy => "ENERGY",
            Subcategory::Transportation => "TRANSPORTATION",
            Subcategory::Communication => "COMMUNICATION",
            Subcategory::Agriculture => "AGRICULTURE",
            Subcategory::AnimalHusbandry => "ANIMAL_HUSBANDRY",
            Subcategory::Fisheries => "FISHERIES",
            Subcategory::SmallScaleIndustries => "SMALL_SCALE_INDUSTRIES",
            Subcategory::MinorForestProduce => "MINOR_FOREST_PRODUCE",
            Subcategory::KhadiAndVillageIndustries => "KHADI_AND_VILLAGE_INDUSTRIES",
            Subcategory::Health => "HEALTH",
            Subcategory::Education => "EDUCATION",
            Subcategory::HousingAndSanitation => "HOUSING_AND_SANITATION",
            Subcategory::SportsAndEntertainment => "SPORTS_AND_ENTERTAINMENT",
            Subcategory::Food => "FOOD",
            Subcategory::WeakerSections => "WEAKER_SECTIONS",
            Subcategory::HandicappedWelfare => "HANDICAPPED_WELFARE",
            Subcategory::FamilyWelfare => "FAMILY_WELFARE",
            Subcategory::WomenAndChildDevelopment => "WOMEN_AND_CHILD_DEVELOPMENT",
            Subcategory::PovertyAlleviation => "POVERTY_ALLEVIATION",
            Subcategory::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Subcategory> {
        match s {
            "FESTIVALS" => Some(Subcategory::Festivals),
            "TREES_AND_FORESTS" => Some(Subcategory::TreesAndForests),
            "SOIL" => Some(Subcategory::Soil),
            "NATURAL_WATER_RESOURCES" => Some(Subcategory::NaturalWaterResources),
            "RELIGIOUS_PLACES" => Some(Subcategory::ReligiousPlaces),
            "LAND" => Some(Subcategory::Land),
            "WATER" => Some(Subcategory::Water),
            "ENERGY" => Some(Subcategory::Energy),
            "TRANSPORTATION" => Some(Subcategory::Transportation),
            "COMMUNICATION" => Some(Subcategory::Communication),
            "AGRICULTURE" => Some(Subcategory::Agriculture),
            "ANIMAL_HUSBANDRY" => Some(Subcategory::AnimalHusbandry),
            "FISHERIES" => Some(Subcategory::Fisheries),
            "SMALL_SCALE_INDUSTRIES" => Some(Subcategory::SmallScaleIndustries),
            "MINOR_FOREST_PRODUCE" => Some(Subcategory::MinorForestProduce),
            "KHADI_AND_VILLAGE_INDUSTRIES" => Some(Subcategory::KhadiAndVillageIndustries),
            "HEALTH" => Some(Subcategory::Health),
            "EDUCATION" => Some(Subcategory::Education),
            "HOUSING_AND_SANITATION" => Some(Subcategory::HousingAndSanitation),
            "SPORTS_AND_ENTERTAINMENT" => Some(Subcategory::SportsAndEntertainment),
            "FOOD" => Some(Subcategory::Food),
            "WEAKER_SECTIONS" => Some(Subcategory::WeakerSections),
            "HANDICAPPED_WELFARE" => Some(Subcategory::HandicappedWelfare),
            "FAMILY_WELFARE" => Some(Subcategory::FamilyWelfare),
            "WOMEN_AND_CHILD_DEVELOPMENT" => Some(Subcategory::WomenAndChildDevelopment),
            "POVERTY_ALLEVIATION" => Some(Subcategory::PovertyAlleviation),
            "OTHER" => Some(Subcategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranscriptionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Async speech-to-text and enhancement state embedded in an issue.
/// Written by the intake API and by summary folds (description labels).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transcription {
    pub request_id: Option<String>,
    pub status: Option<TranscriptionStatus>,
    pub text: Option<String>,
    pub original_transcription: Option<String>,
    pub enhanced_english_transcription: Option<String>,
    pub enhanced_hindi_transcription: Option<String>,
    /// Per-language short labels produced by the summarizer.
    pub description: LangMap,
    pub language: Option<String>,
    pub requested_at: Option<String>,
    pub completed_at: Option<String>,
    pub retry_count: i64,
    pub last_error: Option<String>,
}

/// A citizen-submitted grievance or suggestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: i64,
    pub panchayat_id: i64,
    pub gram_sabha_id: Option<i64>,
    pub text: String,
    pub category: Category,
    pub subcategory: Subcategory,
    pub priority: Priority,
    pub status: IssueStatus,
    pub creator_id: String,
    pub created_for_id: String,
    pub to_be_resolved_before: Option<String>,
    pub remark: Option<String>,
    pub transcription: Transcription,
    pub is_summarized: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Issue {
    /// Text sent to the summarizer: the enhanced English transcription
    /// when present, otherwise the raw transcription text.
    pub fn transcription_text(&self) -> &str {
        self.transcription
            .enhanced_english_transcription
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.transcription.text.as_deref())
            .unwrap_or("")
    }
}

/// Form input for reporting an issue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    #[serde(default)]
    pub text: String,
    pub category: Category,
    pub subcategory: Subcategory,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub creator_id: String,
    #[serde(default)]
    pub created_for_id: String,
    #[serde(default)]
    pub to_be_resolved_before: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub transcription: Transcription,
}
