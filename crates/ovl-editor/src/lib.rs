pub mod activity;
pub mod cloud;
pub mod gesture;
pub mod history;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod subscription;

pub use activity::{Activity, ActivityGate, ActivityGuard, Busy};
pub use cloud::{CloudError, CloudSync};
pub use gesture::ResizeHandle;
pub use history::History;
pub use input::{FocusTarget, InputEvent, Modifiers};
pub use session::{EditorSession, GeometryUpdate, LayerDirection, NewElement};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use subscription::{InputHandler, InputSource, InputSubscription};
