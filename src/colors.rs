use ratatui::style::Color;

// Color Theme Constants
pub const COLOR_HEADER_BG: Color = Color::Rgb(222, 222, 222);     // Light gray background
pub const COLOR_HEADER_FG: Color = Color::Rgb(0, 0, 0);           // Dark text
pub const COLOR_DIR_INFO: Color = Color::Rgb(0, 255, 255);        // Bright cyan
pub const COLOR_SIZE: Color = Color::Rgb(78, 154, 6);             // Green for exact sizes
pub const COLOR_SIZE_PARTIAL: Color = Color::Rgb(196, 160, 0);    // Amber when part of the size is unknown
pub const COLOR_PERCENT: Color = Color::Rgb(255, 255, 255);       // White for percentages
pub const COLOR_CREATED: Color = Color::Rgb(150, 150, 150);       // Gray for creation dates
pub const COLOR_DIRECTORY: Color = Color::Rgb(0, 220, 255);       // Bright cyan for dirs
pub const COLOR_FILE: Color = Color::Rgb(220, 220, 220);          // Light gray for files
pub const COLOR_PROMPT: Color = Color::Rgb(255, 220, 0);          // Yellow for input prompts
pub const COLOR_DANGER: Color = Color::Rgb(255, 80, 80);          // Red for delete confirmation
pub const COLOR_HELP_TITLE: Color = Color::Rgb(0, 255, 255);      // Bright cyan
pub const COLOR_HELP_HEADER: Color = Color::Rgb(255, 220, 0);     // Vibrant yellow
pub const COLOR_HELP_HINT: Color = Color::Rgb(128, 128, 128);     // Gray
pub const COLOR_HIGHLIGHT_BG: Color = Color::Rgb(255, 255, 255);  // White background when selected
pub const COLOR_HIGHLIGHT_FG: Color = Color::Rgb(40, 40, 40);     // Dark gray text when selected
