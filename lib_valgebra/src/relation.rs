/// The relation between the effects of two variants on the same reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Relation {
    Disjoint,
    Overlap,
    Contains,
    IsContained,
    Equivalent,
}

impl Relation {
    /// The relation seen from the other operand.
    /// [`Relation::Contains`] and [`Relation::IsContained`] are each other's
    /// inverses; the remaining relations are symmetric.
    pub const fn inverse(self) -> Self {
        match self {
            Self::Contains => Self::IsContained,
            Self::IsContained => Self::Contains,
            relation => relation,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disjoint => write!(f, "disjoint"),
            Self::Overlap => write!(f, "overlap"),
            Self::Contains => write!(f, "contains"),
            Self::IsContained => write!(f, "is_contained"),
            Self::Equivalent => write!(f, "equivalent"),
        }
    }
}
