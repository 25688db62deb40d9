//! In-page function sources.
//!
//! Every snippet shipped to the browser lives here as a constant string and
//! is evaluated via Runtime.callFunctionOn (bound to an element) or
//! Runtime.evaluate. Bump [`SOURCE_REVISION`] when changing any snippet so
//! mismatched behavior can be traced to a snippet change.

/// Revision marker for the snippet set below.
pub(crate) const SOURCE_REVISION: u32 = 1;

/// Visibility test: an element takes part in layout iff its offsetParent is
/// non-null. The document element is exempt (its offsetParent is always
/// null).
pub(crate) const IS_VISIBLE_FN: &str = r"
function() {
    return this === document.documentElement || this.offsetParent !== null;
}";

/// Center-point occlusion check.
///
/// Passes when the element at the hit point is the candidate itself or one
/// of its descendants, or when either party is nearly transparent
/// (opacity < 0.1 means a hit-transparent overlay).
pub(crate) const OCCLUSION_CHECK_FN: &str = r"
function(x, y) {
    const hit = document.elementFromPoint(x, y);
    if (hit === null) {
        return false;
    }
    if (hit === this || this.contains(hit)) {
        return true;
    }
    const opacity = (el) => parseFloat(window.getComputedStyle(el).opacity || '1');
    return opacity(this) < 0.1 || opacity(hit) < 0.1;
}";

/// Whether the element at the hit point belongs to this element's subtree.
/// Run against sibling candidates to tolerate selector ambiguity.
pub(crate) const CONTAINS_HIT_FN: &str = r"
function(x, y) {
    const hit = document.elementFromPoint(x, y);
    return hit !== null && (hit === this || this.contains(hit));
}";

/// Rendered text of an element.
pub(crate) const INNER_TEXT_FN: &str = r"
function() {
    return this.innerText;
}";

/// Current value of a form control.
pub(crate) const VALUE_FN: &str = r"
function() {
    return this.value;
}";

/// Tag name and type attribute, for capability checks before dispatch.
pub(crate) const TAG_AND_TYPE_FN: &str = r"
function() {
    return { tag: this.tagName, type: this.getAttribute('type') };
}";

/// Checked state of a checkbox or radio button.
pub(crate) const IS_CHECKED_FN: &str = r"
function() {
    return this.checked === true;
}";

/// Set the checked state and fire the change event listeners expect.
pub(crate) const SET_CHECKED_FN: &str = r"
function(checked) {
    if (this.checked !== checked) {
        this.checked = checked;
        this.dispatchEvent(new Event('input', { bubbles: true }));
        this.dispatchEvent(new Event('change', { bubbles: true }));
    }
    return this.checked;
}";

/// Select a combo-box option by value, label, or visible text.
pub(crate) const SELECT_OPTION_FN: &str = r"
function(wanted) {
    for (const option of this.options) {
        if (option.value === wanted || option.label === wanted || option.text === wanted) {
            this.selectedIndex = option.index;
            this.dispatchEvent(new Event('input', { bubbles: true }));
            this.dispatchEvent(new Event('change', { bubbles: true }));
            return true;
        }
    }
    return false;
}";

/// Whether the document currently holds focus.
pub(crate) const DOCUMENT_HAS_FOCUS_EXPR: &str = "document.hasFocus()";

/// Writability probe for the active element.
///
/// Writable means a form control or contentEditable host that is neither
/// disabled nor read-only.
pub(crate) const ACTIVE_WRITABLE_EXPR: &str = r"
(() => {
    const el = document.activeElement;
    if (!el) {
        return { writable: false, tag: null, type: null };
    }
    const tag = el.tagName;
    const formControl = tag === 'INPUT' || tag === 'TEXTAREA' || tag === 'SELECT';
    const writable = (formControl || el.isContentEditable)
        && el.disabled !== true
        && el.readOnly !== true;
    return { writable: writable, tag: tag, type: el.getAttribute('type') };
})()";

/// Viewport center of the active element, for select-all clicks.
pub(crate) const ACTIVE_CENTER_EXPR: &str = r"
(() => {
    const el = document.activeElement;
    if (!el) {
        return null;
    }
    const rect = el.getBoundingClientRect();
    return { x: rect.x + rect.width / 2, y: rect.y + rect.height / 2 };
})()";

/// Scroll the window by a pixel delta.
pub(crate) fn scroll_by_expr(x: i64, y: i64) -> String {
    format!("window.scrollBy({x}, {y})")
}
