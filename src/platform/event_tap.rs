//! Event-Tap Backend
//!
//! Registers a filtering system event tap for the session's pointer input
//! and classifies button and scroll events before the compositor delivers
//! them to the host. Suppressed events are replaced by a null event;
//! everything else is returned to the tap unchanged.
//!
//! The keyboard/button state is queried from the global event source per
//! event, not cached: the tap callback sees the state at tap time.
//!
//! Classification over the raw event-type/field values is portable and
//! unit-tested on every host; only the tap plumbing is
//! `#[cfg(target_os = "macos")]`.

use tracing::info;

use crate::error::Result;
use crate::input::modifiers::RawModifierState;
use crate::input::{ButtonIdentity, ModifierMask, Phase};
use crate::platform::{EventSink, PlatformEventSource};

// CGEventType values for the event set we tap.
const EVENT_LEFT_MOUSE_DOWN: u32 = 1;
const EVENT_LEFT_MOUSE_UP: u32 = 2;
const EVENT_RIGHT_MOUSE_DOWN: u32 = 3;
const EVENT_RIGHT_MOUSE_UP: u32 = 4;
const EVENT_SCROLL_WHEEL: u32 = 22;
const EVENT_OTHER_MOUSE_DOWN: u32 = 25;
const EVENT_OTHER_MOUSE_UP: u32 = 26;

// CGEventFlags modifier bits.
const FLAG_SHIFT: u64 = 0x0002_0000;
const FLAG_CONTROL: u64 = 0x0004_0000;
const FLAG_ALTERNATE: u64 = 0x0008_0000;

// Button numbers reported for "other" mouse events.
const BUTTON_MIDDLE: i64 = 2;
const BUTTON_BACKWARD: i64 = 3;
const BUTTON_FORWARD: i64 = 4;

/// Classify a tapped event into an abstract identity and phase.
///
/// Scroll events pick the identity pair from the axis and the direction
/// from the delta sign; the vertical axis wins when both axes moved in the
/// same event. Zero deltas map to nothing. Positive deltas mean scroll-up
/// and scroll-left, per the tap's line-based delta convention.
pub fn classify_tap_event(
    event_type: u32,
    button_number: i64,
    wheel_dy: i64,
    wheel_dx: i64,
) -> Option<(ButtonIdentity, Phase)> {
    match event_type {
        EVENT_LEFT_MOUSE_DOWN => Some((ButtonIdentity::Left, Phase::Begin)),
        EVENT_LEFT_MOUSE_UP => Some((ButtonIdentity::Left, Phase::End)),
        EVENT_RIGHT_MOUSE_DOWN => Some((ButtonIdentity::Right, Phase::Begin)),
        EVENT_RIGHT_MOUSE_UP => Some((ButtonIdentity::Right, Phase::End)),
        EVENT_OTHER_MOUSE_DOWN | EVENT_OTHER_MOUSE_UP => {
            let identity = match button_number {
                BUTTON_MIDDLE => ButtonIdentity::Middle,
                BUTTON_BACKWARD => ButtonIdentity::Backward,
                BUTTON_FORWARD => ButtonIdentity::Forward,
                _ => return None,
            };
            let phase = if event_type == EVENT_OTHER_MOUSE_DOWN {
                Phase::Begin
            } else {
                Phase::End
            };
            Some((identity, phase))
        }
        EVENT_SCROLL_WHEEL => {
            if wheel_dy > 0 {
                Some((ButtonIdentity::WheelForward, Phase::Begin))
            } else if wheel_dy < 0 {
                Some((ButtonIdentity::WheelBackward, Phase::Begin))
            } else if wheel_dx > 0 {
                Some((ButtonIdentity::WheelLeft, Phase::Begin))
            } else if wheel_dx < 0 {
                Some((ButtonIdentity::WheelRight, Phase::Begin))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Build the raw modifier state from the event's flag bits and the held
/// pointer buttons sampled from the global event source.
pub fn modifier_state_from_flags(flags: u64, held_buttons: ModifierMask) -> RawModifierState {
    RawModifierState {
        ctrl: flags & FLAG_CONTROL != 0,
        shift: flags & FLAG_SHIFT != 0,
        alt: flags & FLAG_ALTERNATE != 0,
        held_buttons,
    }
}

/// System event-tap event source.
pub struct TapEventSource {
    installed: bool,
}

impl TapEventSource {
    /// Create an uninstalled source.
    pub fn new() -> Self {
        Self { installed: false }
    }
}

impl Default for TapEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformEventSource for TapEventSource {
    fn install(&mut self, sink: EventSink) -> Result<()> {
        if self.installed {
            debug_assert!(false, "event tap installed twice");
            self.uninstall()?;
        }
        hook::install(sink)?;
        self.installed = true;
        info!("event tap installed");
        Ok(())
    }

    fn uninstall(&mut self) -> Result<()> {
        if !self.installed {
            return Ok(());
        }
        hook::uninstall();
        self.installed = false;
        info!("event tap removed");
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn name(&self) -> &'static str {
        "event-tap"
    }
}

impl Drop for TapEventSource {
    fn drop(&mut self) {
        // A live tap outliving the plugin would stall the session's input.
        let _ = self.uninstall();
    }
}

#[cfg(target_os = "macos")]
mod hook {
    use std::ffi::c_void;
    use std::ptr;

    use parking_lot::RwLock;

    use super::{classify_tap_event, modifier_state_from_flags};
    use crate::error::{EngineError, Result};
    use crate::input::modifiers::{resolve_mask, Modifier};
    use crate::input::{ModifierMask, PointerEvent};
    use crate::platform::EventSink;

    type CGEventRef = *mut c_void;
    type CFMachPortRef = *mut c_void;
    type CFRunLoopSourceRef = *mut c_void;
    type CFRunLoopRef = *mut c_void;
    type CGEventTapProxy = *mut c_void;

    type TapCallback = unsafe extern "C" fn(
        proxy: CGEventTapProxy,
        event_type: u32,
        event: CGEventRef,
        user_info: *mut c_void,
    ) -> CGEventRef;

    #[link(name = "CoreGraphics", kind = "framework")]
    extern "C" {
        fn CGEventTapCreate(
            tap: u32,
            place: u32,
            options: u32,
            events_of_interest: u64,
            callback: TapCallback,
            user_info: *mut c_void,
        ) -> CFMachPortRef;
        fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
        fn CGEventGetIntegerValueField(event: CGEventRef, field: u32) -> i64;
        fn CGEventGetFlags(event: CGEventRef) -> u64;
        fn CGEventSourceButtonState(state_id: u32, button: u32) -> bool;
    }

    #[link(name = "CoreFoundation", kind = "framework")]
    extern "C" {
        fn CFMachPortCreateRunLoopSource(
            allocator: *const c_void,
            port: CFMachPortRef,
            order: isize,
        ) -> CFRunLoopSourceRef;
        fn CFRunLoopGetMain() -> CFRunLoopRef;
        fn CFRunLoopAddSource(rl: CFRunLoopRef, source: CFRunLoopSourceRef, mode: *const c_void);
        fn CFRunLoopRemoveSource(
            rl: CFRunLoopRef,
            source: CFRunLoopSourceRef,
            mode: *const c_void,
        );
        fn CFRelease(cf: *const c_void);
        #[allow(non_upper_case_globals)]
        static kCFRunLoopCommonModes: *const c_void;
    }

    const SESSION_EVENT_TAP: u32 = 1;
    const HEAD_INSERT_EVENT_TAP: u32 = 0;
    const TAP_OPTION_DEFAULT: u32 = 0;
    const MOUSE_EVENT_BUTTON_NUMBER: u32 = 23;
    const SCROLL_WHEEL_DELTA_AXIS_1: u32 = 11;
    const SCROLL_WHEEL_DELTA_AXIS_2: u32 = 12;
    const COMBINED_SESSION_STATE: u32 = 0;

    struct TapState {
        tap: CFMachPortRef,
        source: CFRunLoopSourceRef,
        sink: EventSink,
    }

    // Raw mach port and run-loop source handles; only touched from the
    // install/uninstall path and the tap callback.
    unsafe impl Send for TapState {}
    unsafe impl Sync for TapState {}

    static TAP: RwLock<Option<TapState>> = RwLock::new(None);

    fn held_buttons() -> ModifierMask {
        let mut held = ModifierMask::empty();
        let buttons = [
            (0, Modifier::LeftButton),
            (1, Modifier::RightButton),
            (2, Modifier::MiddleButton),
            (3, Modifier::BackwardButton),
            (4, Modifier::ForwardButton),
        ];
        for (number, bit) in buttons {
            if unsafe { CGEventSourceButtonState(COMBINED_SESSION_STATE, number) } {
                held |= bit;
            }
        }
        held
    }

    unsafe extern "C" fn tap_callback(
        _proxy: CGEventTapProxy,
        event_type: u32,
        event: CGEventRef,
        _user_info: *mut c_void,
    ) -> CGEventRef {
        let Some(sink) = TAP.read().as_ref().map(|state| state.sink.clone()) else {
            return event;
        };

        let button = unsafe { CGEventGetIntegerValueField(event, MOUSE_EVENT_BUTTON_NUMBER) };
        let dy = unsafe { CGEventGetIntegerValueField(event, SCROLL_WHEEL_DELTA_AXIS_1) };
        let dx = unsafe { CGEventGetIntegerValueField(event, SCROLL_WHEEL_DELTA_AXIS_2) };

        if let Some((identity, phase)) = classify_tap_event(event_type, button, dy, dx) {
            let flags = unsafe { CGEventGetFlags(event) };
            let raw = modifier_state_from_flags(flags, held_buttons());
            let pointer_event = PointerEvent {
                identity,
                phase,
                modifiers: resolve_mask(raw, identity),
            };
            if sink(pointer_event).is_suppress() {
                return ptr::null_mut();
            }
        }
        event
    }

    const fn event_mask_bit(event_type: u32) -> u64 {
        1 << event_type
    }

    pub(super) fn install(sink: EventSink) -> Result<()> {
        let interest = event_mask_bit(super::EVENT_LEFT_MOUSE_DOWN)
            | event_mask_bit(super::EVENT_LEFT_MOUSE_UP)
            | event_mask_bit(super::EVENT_RIGHT_MOUSE_DOWN)
            | event_mask_bit(super::EVENT_RIGHT_MOUSE_UP)
            | event_mask_bit(super::EVENT_OTHER_MOUSE_DOWN)
            | event_mask_bit(super::EVENT_OTHER_MOUSE_UP)
            | event_mask_bit(super::EVENT_SCROLL_WHEEL);

        let tap = unsafe {
            CGEventTapCreate(
                SESSION_EVENT_TAP,
                HEAD_INSERT_EVENT_TAP,
                TAP_OPTION_DEFAULT,
                interest,
                tap_callback,
                ptr::null_mut(),
            )
        };
        if tap.is_null() {
            return Err(EngineError::TapCreationFailed(
                "CGEventTapCreate returned null (missing accessibility permission?)".to_string(),
            ));
        }

        let source = unsafe { CFMachPortCreateRunLoopSource(ptr::null(), tap, 0) };
        if source.is_null() {
            unsafe { CFRelease(tap) };
            return Err(EngineError::TapCreationFailed(
                "could not create run loop source".to_string(),
            ));
        }

        unsafe {
            CFRunLoopAddSource(CFRunLoopGetMain(), source, kCFRunLoopCommonModes);
            CGEventTapEnable(tap, true);
        }
        *TAP.write() = Some(TapState { tap, source, sink });
        Ok(())
    }

    pub(super) fn uninstall() {
        let Some(state) = TAP.write().take() else {
            return;
        };
        unsafe {
            CGEventTapEnable(state.tap, false);
            CFRunLoopRemoveSource(CFRunLoopGetMain(), state.source, kCFRunLoopCommonModes);
            CFRelease(state.source);
            CFRelease(state.tap);
        }
    }
}

#[cfg(not(target_os = "macos"))]
mod hook {
    use crate::error::{EngineError, Result};
    use crate::platform::EventSink;

    pub(super) fn install(_sink: EventSink) -> Result<()> {
        Err(EngineError::UnsupportedPlatform(
            "event taps require macOS",
        ))
    }

    pub(super) fn uninstall() {}
}
