//! `HtmlAudioElement`-backed UI sound playback.

use platform_host::SoundSink;

/// Default location of bundled UI sound assets, relative to the page.
pub const DEFAULT_SOUND_BASE_URL: &str = "/sounds";

#[derive(Debug, Clone)]
/// Browser sound sink that plays `<base_url>/<cue>.mp3` through a detached audio element.
pub struct WebSoundSink {
    base_url: String,
}

impl Default for WebSoundSink {
    fn default() -> Self {
        Self::new(DEFAULT_SOUND_BASE_URL)
    }
}

impl WebSoundSink {
    /// Creates a sink that resolves cue assets under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the asset URL used for `cue_token`.
    pub fn asset_url(&self, cue_token: &str) -> String {
        format!("{}/{cue_token}.mp3", self.base_url)
    }
}

impl SoundSink for WebSoundSink {
    fn play(&self, cue_token: &'static str, gain: f32) {
        if gain <= 0.0 {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(&self.asset_url(cue_token))
            else {
                return;
            };
            audio.set_volume(f64::from(gain.clamp(0.0, 1.0)));
            // Autoplay rejection surfaces as a rejected promise; nothing to recover.
            let _ = audio.play();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = cue_token;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_url_strips_trailing_slash() {
        let sink = WebSoundSink::new("https://cdn.example/sfx/");
        assert_eq!(sink.asset_url("startup"), "https://cdn.example/sfx/startup.mp3");
        assert_eq!(
            WebSoundSink::default().asset_url("close"),
            "/sounds/close.mp3"
        );
    }
}
