pub mod artifact;
pub mod codegen;
pub mod intent;
pub mod project;
pub mod publish;
pub mod session;
pub mod voice;

pub use artifact::{DeploymentRecord, GeneratedArtifact, RepositoryHandle, UploadReport};
pub use codegen::CodeGenerator;
pub use intent::Intent;
pub use publish::{DeploymentPublisher, RepositoryPublisher};
pub use session::{CommandLoop, SessionOutcome, SessionPhase, SessionSettings};
pub use voice::VoiceIo;
