use rand::{seq::SliceRandom, Rng};

pub const BUDDY_NAMES: [&str; 5] = ["Alex", "Jordan", "Casey", "Taylor", "Morgan"];

pub fn pick_buddy<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    // non-empty pool
    BUDDY_NAMES.choose(rng).copied().unwrap_or(BUDDY_NAMES[0])
}

pub fn random_buddy() -> String {
    pick_buddy(&mut rand::thread_rng()).to_string()
}
