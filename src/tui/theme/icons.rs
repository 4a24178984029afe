//! Nerd Font icons (https://www.nerdfonts.com)

#[derive(Debug, Clone)]
pub struct Icons {
    pub play: &'static str,
    pub pause: &'static str,
    pub stop: &'static str,

    pub volume_mute: &'static str,
    pub volume_low: &'static str,
    pub volume_high: &'static str,

    pub repeat: &'static str,
    pub repeat_one: &'static str,
    pub shuffle: &'static str,

    pub error: &'static str,
    pub info: &'static str,

    pub music: &'static str,
    pub playlist: &'static str,
    pub lyrics: &'static str,
    pub favorite: &'static str,
    pub search: &'static str,

    pub selected: &'static str,

    pub progress_full: &'static str,
    pub progress_empty: &'static str,
    pub progress_head: &'static str,
}

impl Icons {
    pub const fn nerd() -> Self {
        Self {
            play: "\u{f04b}",        // nf-fa-play
            pause: "\u{f04c}",       // nf-fa-pause
            stop: "\u{f04d}",        // nf-fa-stop

            volume_mute: "\u{f026}", // nf-fa-volume_off
            volume_low: "\u{f027}",  // nf-fa-volume_down
            volume_high: "\u{f028}", // nf-fa-volume_up

            repeat: "\u{f456}",      // nf-md-repeat
            repeat_one: "\u{f458}",  // nf-md-repeat_once
            shuffle: "\u{f49d}",     // nf-md-shuffle

            error: "\u{f00d}",       // nf-fa-times
            info: "\u{f05a}",        // nf-fa-info_circle

            music: "\u{f001}",       // nf-fa-music
            playlist: "\u{f0cb}",    // nf-fa-list_ol
            lyrics: "\u{f15c}",      // nf-fa-file_text_o
            favorite: "\u{f004}",    // nf-fa-heart
            search: "\u{f002}",      // nf-fa-search

            selected: "\u{f054} ",   // nf-fa-chevron_right

            progress_full: "━",
            progress_empty: "─",
            progress_head: "●",
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::nerd()
    }
}
