//! Default catalog entries used to seed an empty database.

pub const SAUCES: &[&str] = &["tomato", "bbq", "buffalo", "ranch"];

pub const TOPPINGS: &[&str] = &[
    "cheese",
    "pepperoni",
    "mushrooms",
    "onions",
    "pineapple",
    "bell peppers",
    "jalapenos",
    "olives",
    "bacon",
];
