pub mod outcome;
pub mod playlist;
pub mod track;
