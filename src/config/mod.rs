use strum::{Display, EnumString};

use crate::error::{TreeError, TreeResult};

/// Smallest minimum degree a B-tree can be built with.
pub const MIN_DEGREE_FLOOR: usize = 2;
/// Smallest order an m-way tree can be built with.
pub const ORDER_FLOOR: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Variant {
    /// Balanced by minimum degree `t`.
    BTree,
    /// Balanced by order `m`.
    MWay,
}

impl Variant {
    /// Balance parameter used when none is given: `t = 2` for the B-tree and
    /// `m = 3` (a 2-3 tree) for the m-way tree.
    pub fn default_parameter(&self) -> usize {
        match self {
            Variant::BTree => 2,
            Variant::MWay => 3,
        }
    }

    /// Smallest balance parameter this variant accepts.
    pub fn floor(&self) -> usize {
        match self {
            Variant::BTree => MIN_DEGREE_FLOOR,
            Variant::MWay => ORDER_FLOOR,
        }
    }

    pub fn parameter_name(&self) -> &'static str {
        match self {
            Variant::BTree => "minimum degree t",
            Variant::MWay => "order m",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    pub variant: Variant,
    /// `t` for [`Variant::BTree`], `m` for [`Variant::MWay`].
    pub parameter: usize,
}

impl TreeConfig {
    pub fn btree(min_degree: usize) -> Self {
        TreeConfig {
            variant: Variant::BTree,
            parameter: min_degree,
        }
    }

    pub fn mway(order: usize) -> Self {
        TreeConfig {
            variant: Variant::MWay,
            parameter: order,
        }
    }

    /// Rejects parameters no node layout can satisfy.
    pub fn validate(&self) -> TreeResult<()> {
        let floor = self.variant.floor();
        if self.parameter < floor {
            return Err(TreeError::InvalidParameter(format!(
                "{} must be at least {}, got {}",
                self.variant.parameter_name(),
                floor,
                self.parameter
            )));
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig::btree(Variant::BTree.default_parameter())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{TreeConfig, Variant};

    #[test]
    fn parse_variant() {
        assert_eq!(Variant::from_str("btree").unwrap(), Variant::BTree);
        assert_eq!(Variant::from_str("MWay").unwrap(), Variant::MWay);
        assert!(Variant::from_str("avl").is_err());
        assert_eq!(Variant::MWay.to_string(), "mway");
    }

    #[test]
    fn validate_parameter_floor() {
        assert!(TreeConfig::default().validate().is_ok());
        assert!(TreeConfig::btree(1).validate().is_err());
        assert!(TreeConfig::mway(2).validate().is_err());
        assert!(TreeConfig::mway(3).validate().is_ok());
        for variant in [Variant::BTree, Variant::MWay] {
            let config = TreeConfig {
                variant,
                parameter: variant.floor(),
            };
            assert!(config.validate().is_ok());
            let below = TreeConfig {
                variant,
                parameter: variant.floor() - 1,
            };
            assert!(below.validate().is_err());
        }
    }
}
