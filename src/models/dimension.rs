// src/models/dimension.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::common::error::AppError;

/// Eixo de agrupamento dos relatórios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    Universe,
    Category,
    SubCategory,
    Family,
    SubFamily,
    Specificity,
    Range,
    Brand,
    Distributor,
    Pharmacy,
    Product,
    Month,
}

impl GroupDimension {
    pub const ALL: [GroupDimension; 12] = [
        GroupDimension::Universe,
        GroupDimension::Category,
        GroupDimension::SubCategory,
        GroupDimension::Family,
        GroupDimension::SubFamily,
        GroupDimension::Specificity,
        GroupDimension::Range,
        GroupDimension::Brand,
        GroupDimension::Distributor,
        GroupDimension::Pharmacy,
        GroupDimension::Product,
        GroupDimension::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupDimension::Universe => "universe",
            GroupDimension::Category => "category",
            GroupDimension::SubCategory => "sub_category",
            GroupDimension::Family => "family",
            GroupDimension::SubFamily => "sub_family",
            GroupDimension::Specificity => "specificity",
            GroupDimension::Range => "range",
            GroupDimension::Brand => "brand",
            GroupDimension::Distributor => "distributor",
            GroupDimension::Pharmacy => "pharmacy",
            GroupDimension::Product => "product",
            GroupDimension::Month => "month",
        }
    }
}

impl FromStr for GroupDimension {
    type Err = AppError;

    // Aceita também o formato do front ("subCategory", "sub-category").
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        GroupDimension::ALL
            .into_iter()
            .find(|d| d.as_str().replace('_', "") == normalized)
            .ok_or_else(|| AppError::UnknownDimension(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_camel_and_kebab_case() {
        assert_eq!("sub_category".parse::<GroupDimension>().unwrap(), GroupDimension::SubCategory);
        assert_eq!("subCategory".parse::<GroupDimension>().unwrap(), GroupDimension::SubCategory);
        assert_eq!("sub-family".parse::<GroupDimension>().unwrap(), GroupDimension::SubFamily);
        assert_eq!("Month".parse::<GroupDimension>().unwrap(), GroupDimension::Month);
    }

    #[test]
    fn unknown_dimension_is_an_error() {
        assert!(matches!(
            "color".parse::<GroupDimension>(),
            Err(AppError::UnknownDimension(name)) if name == "color"
        ));
    }
}
