mod catalog;
mod ids;
mod instruction;
mod progress;
mod protocol;
mod question;
mod session;
mod staff;
mod video;

pub use ids::{
    LearnerId, ModuleId, ParseIdError, ProgramId, ProtocolId, QuestionId, TestId, VideoId,
};

pub use catalog::{TestCategory, TestMeta, sample_work_at_height_test};
pub use instruction::{
    GeneratedInstruction, GenerationRequest, Instruction, InstructionDraft, InstructionKind,
};
pub use progress::{ModuleProgress, ProgramProgress, ProgramStatus, format_time_spent};
pub use protocol::{PASSING_THRESHOLD, ProtocolRecord, score_percentage};
pub use question::{QuestionError, TestQuestion};
pub use session::{
    EXAM_DURATION_SECS, SessionError, SessionResult, SessionStatus, TestMode, TestSession,
};
pub use staff::{
    AssignmentDraft, AssignmentOverview, LearnerAssignment, Program, Role, User, UserDraft,
};
pub use video::{EmployeeVideoProgress, VideoProgress, is_watched};
