use rand::Rng;
use rand::seq::IndexedRandom;

/// Catalogue used by the "random suggestion" shortcut
pub const SUGGESTIONS: &[&str] = &[
    "Contemplate the meaning of life",
    "Pet a cat (if you have one)",
    "Stare at the ceiling for 10 minutes",
    "Practice your evil laugh",
    "Eat snacks while pretending to work",
    "Convince a plant to grow faster",
    "Have a staring contest with yourself",
    "Reorganize your bookshelf for no reason",
    "Teach your pet to do taxes",
    "Become best friends with your rubber duck",
    "Question all your life choices",
    "Learn to walk backwards",
    "Argue with autocorrect",
    "Make a sandwich with your eyes closed",
    "Pretend you're in a movie scene",
    "Find the meaning of \"Wednesday\"",
    "Yell at clouds (optional)",
    "Invent a new dance move",
    "Talk to plants about their feelings",
    "Wonder why we park in driveways",
    "Count how many times you blink today",
    "Write a poem about socks",
    "Befriend a cloud",
    "Try to lick your own elbow",
    "Make friends with the dust bunnies",
];

/// Pick one suggestion at random
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SUGGESTIONS.choose(rng).copied().unwrap_or(SUGGESTIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn picks_from_catalogue() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(SUGGESTIONS.contains(&pick(&mut rng)));
        }
    }

    #[test]
    fn seeded_picks_are_repeatable() {
        let a: Vec<_> = (0..5).map({
            let mut rng = StdRng::seed_from_u64(42);
            move |_| pick(&mut rng)
        }).collect();
        let b: Vec<_> = (0..5).map({
            let mut rng = StdRng::seed_from_u64(42);
            move |_| pick(&mut rng)
        }).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn every_suggestion_is_valid_task_text() {
        let config = crate::model::config::StoreConfig::default();
        for s in SUGGESTIONS {
            assert!(crate::ops::task_ops::validate_text(s, &config).is_ok());
        }
    }
}
