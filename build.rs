#[cfg(feature = "tauri")]
const COMMANDS: &[&str] = &[
  "list_platforms",
  "css_defaults",
  "classify_preview",
  "open_session",
  "dispatch",
  "session_state",
  "menu_buttons",
  "close_session",
];

fn main() {
  #[cfg(feature = "tauri")]
  tauri_plugin::Builder::new(COMMANDS).build();
}
