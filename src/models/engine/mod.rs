pub mod hit_window;
pub mod note;
pub mod particle;

pub use hit_window::HitWindow;
pub use note::Note;
pub use particle::Particle;
