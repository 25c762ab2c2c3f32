//! Cached market and variant descriptions
//!
//! Entries are built from catalog payloads one language at a time. Merging is
//! monotonic: a new language adds names, an existing language is overwritten
//! only by a non-empty value, and nothing already present is removed. Merging
//! the same payload twice leaves the entry unchanged.

use super::catalog::{
    AttributeDto, MappingDto, MarketDescriptionDto, OutcomeDto, OutcomeMappingDto,
    SpecifierDto, VariantDescriptionDto,
};
use crate::domain::{parse_specifiers, Language, Specifiers, Urn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Name of the specifier that carries a concrete variant token
pub const VARIANT_SPECIFIER: &str = "variant";

/// `outcome_type` marker for markets whose outcomes are only known per occurrence
pub const FREE_TEXT_OUTCOME_TYPE: &str = "free_text";

pub type LocalizedText = HashMap<Language, String>;

fn merge_text(target: &mut LocalizedText, language: &Language, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        target.insert(language.clone(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecifierType {
    Integer,
    Decimal,
    String,
    VariableText,
}

impl SpecifierType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "integer" | "int" => SpecifierType::Integer,
            "decimal" => SpecifierType::Decimal,
            "variable_text" => SpecifierType::VariableText,
            "string" => SpecifierType::String,
            other => {
                debug!("Unknown specifier type '{}', treating as string", other);
                SpecifierType::String
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecifierDescription {
    pub name: String,
    pub kind: SpecifierType,
    pub description: Option<String>,
}

impl From<&SpecifierDto> for SpecifierDescription {
    fn from(dto: &SpecifierDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            kind: SpecifierType::parse(&dto.kind),
            description: dto.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAttribute {
    pub name: String,
    pub description: Option<String>,
}

impl From<&AttributeDto> for MarketAttribute {
    fn from(dto: &AttributeDto) -> Self {
        Self {
            name: dto.name.clone(),
            description: dto.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDescription {
    pub id: String,
    pub names: LocalizedText,
    pub descriptions: LocalizedText,
}

impl OutcomeDescription {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            names: LocalizedText::new(),
            descriptions: LocalizedText::new(),
        }
    }

    fn merge(&mut self, dto: &OutcomeDto, language: &Language) {
        merge_text(&mut self.names, language, Some(&dto.name));
        merge_text(&mut self.descriptions, language, dto.description.as_deref());
    }

    pub fn name(&self, language: &Language) -> Option<&str> {
        self.names.get(language).map(String::as_str)
    }
}

fn merge_outcomes(target: &mut Vec<OutcomeDescription>, dtos: &[OutcomeDto], language: &Language) {
    for dto in dtos {
        match target.iter_mut().find(|o| o.id == dto.id) {
            Some(existing) => existing.merge(dto, language),
            None => {
                let mut outcome = OutcomeDescription::new(&dto.id);
                outcome.merge(dto, language);
                target.push(outcome);
            }
        }
    }
}

/// Sport scope of a mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SportScope {
    All,
    Sport(Urn),
    Unrecognized(String),
}

impl SportScope {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return SportScope::All;
        }
        match Urn::parse(raw) {
            Ok(urn) => SportScope::Sport(urn),
            Err(_) => SportScope::Unrecognized(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMapping {
    pub outcome_id: String,
    pub product_outcome_id: String,
    pub product_outcome_names: LocalizedText,
}

/// Specifier values a mapping is restricted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidFor {
    Unconstrained,
    /// Every listed specifier must carry the listed value
    Constraints(Specifiers),
    /// `valid_for` is present but malformed; the mapping never applies
    Unparsable,
}

/// Producer-specific translation of a market to vendor-native ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMapping {
    pub producer_id: i32,
    pub producer_ids: Vec<i32>,
    pub sport: SportScope,
    /// Raw vendor market id (`8:232`)
    pub market_id: String,
    pub market_type_id: Option<i32>,
    pub market_sub_type_id: Option<i32>,
    pub sov_template: Option<String>,
    pub valid_for: Option<String>,
    pub outcomes: Vec<OutcomeMapping>,
}

impl MarketMapping {
    fn from_dto(dto: &MappingDto, language: &Language) -> Self {
        let mut producer_ids: Vec<i32> = dto
            .product_ids
            .split('|')
            .filter_map(|id| id.trim().parse().ok())
            .collect();
        if producer_ids.is_empty() {
            producer_ids.push(dto.product_id);
        }

        let mut ids = dto.market_id.split(':');
        let market_type_id = ids.next().and_then(|id| id.trim().parse().ok());
        let market_sub_type_id = ids.next().and_then(|id| id.trim().parse().ok());

        let mut mapping = Self {
            producer_id: dto.product_id,
            producer_ids,
            sport: SportScope::parse(&dto.sport_id),
            market_id: dto.market_id.clone(),
            market_type_id,
            market_sub_type_id,
            sov_template: dto.sov_template.clone().filter(|s| !s.is_empty()),
            valid_for: dto.valid_for.clone().filter(|s| !s.trim().is_empty()),
            outcomes: Vec::new(),
        };
        mapping.merge_outcomes(dto.outcomes.as_deref().unwrap_or_default(), language);
        mapping
    }

    fn same_mapping(&self, dto: &MappingDto) -> bool {
        self.producer_id == dto.product_id
            && self.market_id == dto.market_id
            && self.valid_for.as_deref() == dto.valid_for.as_deref().filter(|s| !s.trim().is_empty())
            && self.sov_template.as_deref() == dto.sov_template.as_deref().filter(|s| !s.is_empty())
    }

    fn merge_outcomes(&mut self, dtos: &[OutcomeMappingDto], language: &Language) {
        for dto in dtos {
            let existing = self
                .outcomes
                .iter_mut()
                .find(|o| o.outcome_id == dto.outcome_id);
            let entry = match existing {
                Some(entry) => {
                    entry.product_outcome_id = dto.product_outcome_id.clone();
                    entry
                }
                None => {
                    self.outcomes.push(OutcomeMapping {
                        outcome_id: dto.outcome_id.clone(),
                        product_outcome_id: dto.product_outcome_id.clone(),
                        product_outcome_names: LocalizedText::new(),
                    });
                    let last = self.outcomes.len() - 1;
                    &mut self.outcomes[last]
                }
            };
            merge_text(
                &mut entry.product_outcome_names,
                language,
                dto.product_outcome_name.as_deref(),
            );
        }
    }

    pub fn constraints(&self) -> ValidFor {
        match self.valid_for.as_deref() {
            None => ValidFor::Unconstrained,
            Some(raw) => match parse_specifiers(raw) {
                Ok(constraints) => ValidFor::Constraints(constraints),
                Err(_) => ValidFor::Unparsable,
            },
        }
    }

    pub fn outcome(&self, outcome_id: &str) -> Option<&OutcomeMapping> {
        self.outcomes.iter().find(|o| o.outcome_id == outcome_id)
    }
}

fn merge_mappings(target: &mut Vec<MarketMapping>, dtos: &[MappingDto], language: &Language) {
    for dto in dtos {
        match target.iter_mut().find(|m| m.same_mapping(dto)) {
            Some(existing) => {
                existing.merge_outcomes(dto.outcomes.as_deref().unwrap_or_default(), language)
            }
            None => target.push(MarketMapping::from_dto(dto, language)),
        }
    }
}

/// How a market's outcome set is determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantReference {
    /// Outcomes come from a shared variant description
    Shared(String),
    /// Outcomes depend on the concrete `variant` specifier of each occurrence
    PerOccurrence,
}

/// Multi-language description of a market shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDescription {
    pub id: i32,
    pub names: LocalizedText,
    pub descriptions: LocalizedText,
    pub specifiers: Vec<SpecifierDescription>,
    pub outcomes: Option<Vec<OutcomeDescription>>,
    pub groups: Vec<String>,
    pub attributes: Vec<MarketAttribute>,
    pub variant: Option<String>,
    pub outcome_type: Option<String>,
    pub mappings: Vec<MarketMapping>,
    pub languages: BTreeSet<Language>,
}

impl MarketDescription {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            names: LocalizedText::new(),
            descriptions: LocalizedText::new(),
            specifiers: Vec::new(),
            outcomes: None,
            groups: Vec::new(),
            attributes: Vec::new(),
            variant: None,
            outcome_type: None,
            mappings: Vec::new(),
            languages: BTreeSet::new(),
        }
    }

    pub fn from_dto(dto: &MarketDescriptionDto, language: &Language) -> Self {
        let mut description = Self::new(dto.id);
        description.merge(dto, language);
        description
    }

    /// Fold one language's payload into this entry
    pub fn merge(&mut self, dto: &MarketDescriptionDto, language: &Language) {
        merge_text(&mut self.names, language, Some(&dto.name));
        merge_text(&mut self.descriptions, language, dto.description.as_deref());

        if let Some(specifiers) = dto.specifiers.as_ref().filter(|s| !s.is_empty()) {
            self.specifiers = specifiers.iter().map(SpecifierDescription::from).collect();
        }
        if let Some(outcomes) = dto.outcomes.as_ref() {
            merge_outcomes(self.outcomes.get_or_insert_with(Vec::new), outcomes, language);
        }
        if let Some(groups) = dto.groups.as_deref().filter(|g| !g.trim().is_empty()) {
            self.groups = groups.split('|').map(|g| g.trim().to_string()).collect();
        }
        if let Some(attributes) = dto.attributes.as_ref().filter(|a| !a.is_empty()) {
            self.attributes = attributes.iter().map(MarketAttribute::from).collect();
        }
        if let Some(variant) = dto.variant.as_deref().filter(|v| !v.trim().is_empty()) {
            self.variant = Some(variant.trim().to_string());
        }
        if let Some(outcome_type) = dto.outcome_type.as_deref().filter(|v| !v.trim().is_empty()) {
            self.outcome_type = Some(outcome_type.trim().to_string());
        }
        if let Some(mappings) = dto.mappings.as_ref() {
            merge_mappings(&mut self.mappings, mappings, language);
        }

        self.drop_foreign_valid_for();
        self.languages.insert(language.clone());
    }

    /// Remove mappings whose `valid_for` names a specifier this market does not declare
    fn drop_foreign_valid_for(&mut self) {
        let declared: Vec<&str> = self.specifiers.iter().map(|s| s.name.as_str()).collect();
        let market_id = self.id;
        self.mappings.retain(|mapping| {
            let ValidFor::Constraints(constraints) = mapping.constraints() else {
                return true;
            };
            let foreign = constraints
                .keys()
                .find(|name| !declared.contains(&name.as_str()));
            match foreign {
                Some(name) => {
                    warn!(
                        "Market {} mapping {} valid_for names undeclared specifier '{}', dropping it",
                        market_id, mapping.market_id, name
                    );
                    false
                }
                None => true,
            }
        });
    }

    pub fn name(&self, language: &Language) -> Option<&str> {
        self.names.get(language).map(String::as_str)
    }

    pub fn declares_specifier(&self, name: &str) -> bool {
        self.specifiers.iter().any(|s| s.name == name)
    }

    pub fn has_free_text_outcomes(&self) -> bool {
        self.outcome_type.as_deref() == Some(FREE_TEXT_OUTCOME_TYPE)
    }

    /// Whether outcomes are not enumerated on the market itself
    pub fn is_variant_dependent(&self) -> bool {
        self.declares_specifier(VARIANT_SPECIFIER) || self.has_free_text_outcomes()
    }

    pub fn variant_reference(&self) -> Option<VariantReference> {
        if let Some(variant) = &self.variant {
            return Some(VariantReference::Shared(variant.clone()));
        }
        if self.is_variant_dependent() {
            return Some(VariantReference::PerOccurrence);
        }
        None
    }
}

/// Reusable outcome/mapping set referenced by variant markets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDescription {
    pub id: String,
    pub outcomes: Vec<OutcomeDescription>,
    pub mappings: Vec<MarketMapping>,
    pub languages: BTreeSet<Language>,
}

impl VariantDescription {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            outcomes: Vec::new(),
            mappings: Vec::new(),
            languages: BTreeSet::new(),
        }
    }

    pub fn from_dto(dto: &VariantDescriptionDto, language: &Language) -> Self {
        let mut description = Self::new(&dto.id);
        description.merge(dto, language);
        description
    }

    pub fn merge(&mut self, dto: &VariantDescriptionDto, language: &Language) {
        if let Some(outcomes) = dto.outcomes.as_ref() {
            merge_outcomes(&mut self.outcomes, outcomes, language);
        }
        if let Some(mappings) = dto.mappings.as_ref() {
            merge_mappings(&mut self.mappings, mappings, language);
        }
        self.languages.insert(language.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: &str) -> MarketDescriptionDto {
        MarketDescriptionDto {
            id: 18,
            name: name.to_string(),
            description: None,
            variant: None,
            outcome_type: None,
            groups: Some("all|score|regular_play".to_string()),
            specifiers: Some(vec![SpecifierDto {
                name: "total".to_string(),
                kind: "decimal".to_string(),
                description: None,
            }]),
            outcomes: Some(vec![
                OutcomeDto {
                    id: "12".to_string(),
                    name: format!("{} over", name),
                    description: None,
                },
                OutcomeDto {
                    id: "13".to_string(),
                    name: format!("{} under", name),
                    description: None,
                },
            ]),
            attributes: None,
            mappings: Some(vec![MappingDto {
                product_id: 1,
                product_ids: "1|4".to_string(),
                sport_id: "sr:sport:1".to_string(),
                market_id: "8:232".to_string(),
                sov_template: Some("{total}".to_string()),
                valid_for: None,
                outcomes: None,
            }]),
        }
    }

    #[test]
    fn test_merge_adds_languages_without_losing_existing() {
        let en = Language::new("en");
        let de = Language::new("de");
        let mut description = MarketDescription::from_dto(&dto("Total"), &en);
        description.merge(&dto("Gesamt"), &de);

        assert_eq!(description.name(&en), Some("Total"));
        assert_eq!(description.name(&de), Some("Gesamt"));
        assert_eq!(description.groups, vec!["all", "score", "regular_play"]);
        let outcomes = description.outcomes.as_ref().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name(&de), Some("Gesamt over"));
        assert_eq!(description.languages.len(), 2);
    }

    #[test]
    fn test_empty_name_does_not_overwrite() {
        let en = Language::new("en");
        let mut description = MarketDescription::from_dto(&dto("Total"), &en);
        description.merge(&dto(""), &en);
        assert_eq!(description.name(&en), Some("Total"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let en = Language::new("en");
        let mut description = MarketDescription::from_dto(&dto("Total"), &en);
        let snapshot = description.clone();
        description.merge(&dto("Total"), &en);
        assert_eq!(description, snapshot);
    }

    #[test]
    fn test_mapping_ids_are_split() {
        let en = Language::new("en");
        let description = MarketDescription::from_dto(&dto("Total"), &en);
        let mapping = &description.mappings[0];
        assert_eq!(mapping.producer_ids, vec![1, 4]);
        assert_eq!(mapping.market_type_id, Some(8));
        assert_eq!(mapping.market_sub_type_id, Some(232));
        assert_eq!(mapping.sport, SportScope::Sport(Urn::sport(1)));
    }

    #[test]
    fn test_foreign_valid_for_is_dropped() {
        let en = Language::new("en");
        let mut payload = dto("Total");
        payload.mappings.as_mut().unwrap()[0].valid_for = Some("setnr=1".to_string());
        let description = MarketDescription::from_dto(&payload, &en);
        assert!(description.mappings.is_empty());
    }

    #[test]
    fn test_variant_reference() {
        let en = Language::new("en");
        let mut payload = dto("Correct score");
        payload.outcomes = None;
        payload.specifiers = Some(vec![SpecifierDto {
            name: VARIANT_SPECIFIER.to_string(),
            kind: "variable_text".to_string(),
            description: None,
        }]);
        let description = MarketDescription::from_dto(&payload, &en);
        assert_eq!(
            description.variant_reference(),
            Some(VariantReference::PerOccurrence)
        );

        payload.variant = Some("sr:correct_score:max:6".to_string());
        let description = MarketDescription::from_dto(&payload, &en);
        assert_eq!(
            description.variant_reference(),
            Some(VariantReference::Shared("sr:correct_score:max:6".to_string()))
        );
    }

    #[test]
    fn test_valid_for_constraints() {
        let en = Language::new("en");
        let mut mapping = MarketDescription::from_dto(&dto("Total"), &en).mappings[0].clone();
        assert_eq!(mapping.constraints(), ValidFor::Unconstrained);

        mapping.valid_for = Some("total=2.5".to_string());
        match mapping.constraints() {
            ValidFor::Constraints(constraints) => {
                assert_eq!(constraints.get("total").map(String::as_str), Some("2.5"))
            }
            other => panic!("expected constraints, got {:?}", other),
        }

        mapping.valid_for = Some("=2.5".to_string());
        assert_eq!(mapping.constraints(), ValidFor::Unparsable);
    }
}
