pub mod critique_frame;

pub use critique_frame::CritiqueFrameUseCase;
