//! Flashcard and dialogue shadowing practice
//!
//! Cards and conversation scenes are shown in a target language, spoken
//! through a [`speech::Speaker`], and the learner's repetition is heard by a
//! [`speech::Recognizer`] and graded with [`similarity::similarity`].

pub mod config;
pub mod data;
pub mod lang;
pub mod practice;
pub mod render;
pub mod seed;
pub mod shadow;
pub mod similarity;
pub mod speech;
pub mod stats;
