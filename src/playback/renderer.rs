use crate::asset::Arch;
use bytes::Bytes;

/// Mesh display capability.
///
/// The implementation owns the slot-to-mesh mapping; the controller only asks for slots to
/// be filled, emptied or hidden. Calls are made while the controller's state is locked, so
/// an implementation must not call back into the controller.
pub trait Renderer: Send {
    /// Decode `bytes` and show the result in `slot`, replacing the previous mesh.
    fn load_mesh(&mut self, bytes: Bytes, slot: Arch);

    /// Remove whatever `slot` shows. Used for steps where one arch has no mesh.
    fn clear_slot(&mut self, slot: Arch);

    fn set_slot_visible(&mut self, slot: Arch, visible: bool);
}
