pub mod best_move;
pub mod play;
pub mod render;
pub mod verify;
