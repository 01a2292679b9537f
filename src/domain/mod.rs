pub mod clock;
pub mod facility;
pub mod hours_of_operation;
pub mod id;
pub mod recommender;
pub mod search;
pub mod seed_store;
pub mod seeded_rng;
pub mod slots;
