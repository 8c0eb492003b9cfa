//! Whole-pizza coverage rule for sauce and topping placements.

use crate::error::{PizzeriaError, Result};
use crate::models::IngredientSection;

/// True when the sections span the whole pizza: some placement covers
/// `WHOLE`, or some placement covers `LEFT` and some placement covers `RIGHT`.
///
/// Mixing `WHOLE` with halves, or stacking several placements on one
/// section, is accepted.
pub fn covers_whole_pizza<I>(sections: I) -> bool
where
    I: IntoIterator<Item = IngredientSection>,
{
    let (mut whole, mut left, mut right) = (false, false, false);
    for section in sections {
        match section {
            IngredientSection::Whole => whole = true,
            IngredientSection::Left => left = true,
            IngredientSection::Right => right = true,
        }
    }
    whole || (left && right)
}

pub fn check_coverage<I>(sections: I) -> Result<()>
where
    I: IntoIterator<Item = IngredientSection>,
{
    if covers_whole_pizza(sections) {
        Ok(())
    } else {
        Err(PizzeriaError::coverage())
    }
}
