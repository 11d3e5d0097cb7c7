//! Message-Interception Backend
//!
//! Subclasses the host window's message procedure and classifies pointer
//! button/wheel messages before the host sees them. Suppressed messages are
//! swallowed (the hook returns without forwarding); everything else is
//! passed to the original procedure unchanged.
//!
//! Classification and modifier extraction are plain functions over the
//! message parameters and compile on every target; the subclass plumbing
//! itself is `#[cfg(windows)]`.

use tracing::info;

use crate::error::Result;
use crate::input::modifiers::{Modifier, RawModifierState};
use crate::input::{ButtonIdentity, ModifierMask, Phase};
use crate::platform::{EventSink, PlatformEventSource};

/// Class and title of the host simulator window.
pub const HOST_WINDOW_CLASS: &str = "X-System";

// Pointer input messages.
const WM_LBUTTONDOWN: u32 = 0x0201;
const WM_LBUTTONUP: u32 = 0x0202;
const WM_RBUTTONDOWN: u32 = 0x0204;
const WM_RBUTTONUP: u32 = 0x0205;
const WM_MBUTTONDOWN: u32 = 0x0207;
const WM_MBUTTONUP: u32 = 0x0208;
const WM_MOUSEWHEEL: u32 = 0x020A;
const WM_XBUTTONDOWN: u32 = 0x020B;
const WM_XBUTTONUP: u32 = 0x020C;
const WM_MOUSEHWHEEL: u32 = 0x020E;

// Key/button state bits carried in the low word of wParam.
const MK_LBUTTON: usize = 0x0001;
const MK_RBUTTON: usize = 0x0002;
const MK_SHIFT: usize = 0x0004;
const MK_CONTROL: usize = 0x0008;
const MK_MBUTTON: usize = 0x0010;
const MK_XBUTTON1: usize = 0x0020;
const MK_XBUTTON2: usize = 0x0040;

// High word of wParam for WM_XBUTTON*.
const XBUTTON1: u16 = 0x0001;
const XBUTTON2: u16 = 0x0002;

const fn high_word(wparam: usize) -> u16 {
    ((wparam >> 16) & 0xFFFF) as u16
}

/// Signed wheel rotation carried in the high word of wParam.
const fn wheel_delta(wparam: usize) -> i16 {
    high_word(wparam) as i16
}

/// Classify a window message into an abstract identity and phase.
///
/// Wheel messages map the scroll axis to an identity pair and the delta
/// sign to a direction; a zero delta maps to nothing (the message is
/// forwarded untouched). Unrelated messages map to `None`.
pub fn classify_message(msg: u32, wparam: usize) -> Option<(ButtonIdentity, Phase)> {
    match msg {
        WM_LBUTTONDOWN => Some((ButtonIdentity::Left, Phase::Begin)),
        WM_LBUTTONUP => Some((ButtonIdentity::Left, Phase::End)),
        WM_RBUTTONDOWN => Some((ButtonIdentity::Right, Phase::Begin)),
        WM_RBUTTONUP => Some((ButtonIdentity::Right, Phase::End)),
        WM_MBUTTONDOWN => Some((ButtonIdentity::Middle, Phase::Begin)),
        WM_MBUTTONUP => Some((ButtonIdentity::Middle, Phase::End)),
        WM_XBUTTONDOWN | WM_XBUTTONUP => {
            let identity = match high_word(wparam) {
                XBUTTON1 => ButtonIdentity::Backward,
                XBUTTON2 => ButtonIdentity::Forward,
                _ => return None,
            };
            let phase = if msg == WM_XBUTTONDOWN {
                Phase::Begin
            } else {
                Phase::End
            };
            Some((identity, phase))
        }
        WM_MOUSEWHEEL => match wheel_delta(wparam) {
            delta if delta > 0 => Some((ButtonIdentity::WheelForward, Phase::Begin)),
            delta if delta < 0 => Some((ButtonIdentity::WheelBackward, Phase::Begin)),
            _ => None,
        },
        WM_MOUSEHWHEEL => match wheel_delta(wparam) {
            delta if delta > 0 => Some((ButtonIdentity::WheelRight, Phase::Begin)),
            delta if delta < 0 => Some((ButtonIdentity::WheelLeft, Phase::Begin)),
            _ => None,
        },
        _ => None,
    }
}

/// Extract the raw modifier/button state from a pointer message.
///
/// Control, shift and the held buttons are carried in the message's key
/// state bits; the ALT key is not and must be sampled asynchronously by the
/// caller.
pub fn modifier_state_from_message(wparam: usize, alt_down: bool) -> RawModifierState {
    let mut held = ModifierMask::empty();
    if wparam & MK_LBUTTON != 0 {
        held |= Modifier::LeftButton;
    }
    if wparam & MK_RBUTTON != 0 {
        held |= Modifier::RightButton;
    }
    if wparam & MK_MBUTTON != 0 {
        held |= Modifier::MiddleButton;
    }
    if wparam & MK_XBUTTON1 != 0 {
        held |= Modifier::BackwardButton;
    }
    if wparam & MK_XBUTTON2 != 0 {
        held |= Modifier::ForwardButton;
    }

    RawModifierState {
        ctrl: wparam & MK_CONTROL != 0,
        shift: wparam & MK_SHIFT != 0,
        alt: alt_down,
        held_buttons: held,
    }
}

/// Window-procedure subclassing event source.
pub struct MessageEventSource {
    installed: bool,
}

impl MessageEventSource {
    /// Create an uninstalled source.
    pub fn new() -> Self {
        Self { installed: false }
    }
}

impl Default for MessageEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformEventSource for MessageEventSource {
    fn install(&mut self, sink: EventSink) -> Result<()> {
        if self.installed {
            debug_assert!(false, "message hook installed twice");
            self.uninstall()?;
        }
        hook::install(sink)?;
        self.installed = true;
        info!("window procedure hook installed");
        Ok(())
    }

    fn uninstall(&mut self) -> Result<()> {
        if !self.installed {
            return Ok(());
        }
        hook::uninstall()?;
        self.installed = false;
        info!("window procedure hook removed");
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn name(&self) -> &'static str {
        "message"
    }
}

impl Drop for MessageEventSource {
    fn drop(&mut self) {
        // Leaving a dangling subclass would break input for the whole host.
        let _ = self.uninstall();
    }
}

#[cfg(windows)]
mod hook {
    use parking_lot::RwLock;

    use super::{classify_message, modifier_state_from_message, HOST_WINDOW_CLASS};
    use crate::error::{EngineError, Result};
    use crate::input::modifiers::resolve_mask;
    use crate::input::PointerEvent;
    use crate::platform::EventSink;

    type Hwnd = isize;

    #[link(name = "user32")]
    extern "system" {
        fn FindWindowA(class_name: *const u8, window_name: *const u8) -> Hwnd;
        fn SetWindowLongPtrA(hwnd: Hwnd, index: i32, new_long: isize) -> isize;
        fn CallWindowProcA(prev: isize, hwnd: Hwnd, msg: u32, wparam: usize, lparam: isize)
            -> isize;
        fn GetAsyncKeyState(vkey: i32) -> i16;
        fn GetLastError() -> u32;
    }

    const GWLP_WNDPROC: i32 = -4;
    const VK_MENU: i32 = 0x12;

    struct HookState {
        hwnd: Hwnd,
        original_proc: isize,
        sink: EventSink,
    }

    // The window procedure is a C callback with no closure context, so the
    // hook state lives in a process-wide slot. At most one subclass exists
    // per process.
    static HOOK: RwLock<Option<HookState>> = RwLock::new(None);

    unsafe extern "system" fn subclass_proc(
        hwnd: Hwnd,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        // Copy what we need out of the slot before dispatching so the host
        // action can re-enter the message loop without deadlocking.
        let Some((original_proc, sink)) = HOOK
            .read()
            .as_ref()
            .map(|state| (state.original_proc, state.sink.clone()))
        else {
            return 0;
        };

        if let Some((identity, phase)) = classify_message(msg, wparam) {
            let alt_down = unsafe { GetAsyncKeyState(VK_MENU) } < 0;
            let raw = modifier_state_from_message(wparam, alt_down);
            let event = PointerEvent {
                identity,
                phase,
                modifiers: resolve_mask(raw, identity),
            };
            if sink(event).is_suppress() {
                return 0;
            }
        }

        unsafe { CallWindowProcA(original_proc, hwnd, msg, wparam, lparam) }
    }

    pub(super) fn install(sink: EventSink) -> Result<()> {
        let mut class = HOST_WINDOW_CLASS.as_bytes().to_vec();
        class.push(0);

        let hwnd = unsafe { FindWindowA(class.as_ptr(), class.as_ptr()) };
        if hwnd == 0 {
            return Err(EngineError::WindowNotFound);
        }

        let original_proc =
            unsafe { SetWindowLongPtrA(hwnd, GWLP_WNDPROC, subclass_proc as usize as isize) };
        if original_proc == 0 {
            let code = unsafe { GetLastError() };
            return Err(EngineError::HookInstallFailed(format!(
                "SetWindowLongPtr failed ({code})"
            )));
        }

        *HOOK.write() = Some(HookState {
            hwnd,
            original_proc,
            sink,
        });
        Ok(())
    }

    pub(super) fn uninstall() -> Result<()> {
        let Some(state) = HOOK.write().take() else {
            return Ok(());
        };
        let restored =
            unsafe { SetWindowLongPtrA(state.hwnd, GWLP_WNDPROC, state.original_proc) };
        if restored == 0 {
            let code = unsafe { GetLastError() };
            return Err(EngineError::HookUninstallFailed(format!(
                "SetWindowLongPtr failed ({code})"
            )));
        }
        Ok(())
    }
}

#[cfg(not(windows))]
mod hook {
    use crate::error::{EngineError, Result};
    use crate::platform::EventSink;

    pub(super) fn install(_sink: EventSink) -> Result<()> {
        Err(EngineError::UnsupportedPlatform(
            "window subclassing requires Windows",
        ))
    }

    pub(super) fn uninstall() -> Result<()> {
        Ok(())
    }
}
