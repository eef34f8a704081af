pub mod playlist;
pub mod quota;
pub mod track;
