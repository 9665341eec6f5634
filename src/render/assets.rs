use rand::Rng;
use serde::{Deserialize, Serialize};

/// Image sources a sprite can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetId {
    Photo1,
    Photo2,
    Photo3,
    Photo4,
    /// Backdrop behind the letter
    LetterBox,
    /// The ball dropped by the trigger, drawn procedurally
    Seed,
    /// Substitute shown when an image fails to load
    Placeholder,
}

impl AssetId {
    /// The four interchangeable photos
    pub const PHOTOS: [AssetId; 4] = [
        AssetId::Photo1,
        AssetId::Photo2,
        AssetId::Photo3,
        AssetId::Photo4,
    ];

    /// Pick one of the photos uniformly
    pub fn random_photo<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::PHOTOS[rng.gen_range(0..Self::PHOTOS.len())]
    }

    pub fn src(&self) -> &'static str {
        match self {
            AssetId::Photo1 => "1.jpg",
            AssetId::Photo2 => "2.jpg",
            AssetId::Photo3 => "3.jpg",
            AssetId::Photo4 => "4.jpg",
            AssetId::LetterBox => "boxImage.png",
            AssetId::Seed => "seed",
            AssetId::Placeholder => "https://placehold.co/40x40/FF0000/FFFFFF?text=X",
        }
    }

    pub fn is_photo(&self) -> bool {
        Self::PHOTOS.contains(self)
    }

    /// Asset to show instead when this one fails to load
    pub fn on_load_error(&self) -> Self {
        match self {
            AssetId::Seed | AssetId::Placeholder => *self,
            _ => {
                log::warn!("asset {} failed to load, using placeholder", self.src());
                AssetId::Placeholder
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_random_photo_covers_all() {
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<AssetId> = (0..200).map(|_| AssetId::random_photo(&mut rng)).collect();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|a| a.is_photo()));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(AssetId::Photo3.on_load_error(), AssetId::Placeholder);
        assert_eq!(AssetId::LetterBox.on_load_error(), AssetId::Placeholder);
        assert_eq!(AssetId::Placeholder.on_load_error(), AssetId::Placeholder);
        assert_eq!(AssetId::Seed.on_load_error(), AssetId::Seed);
    }

    #[test]
    fn test_sources() {
        assert_eq!(AssetId::Photo1.src(), "1.jpg");
        assert_eq!(AssetId::Photo4.src(), "4.jpg");
        assert_eq!(AssetId::LetterBox.src(), "boxImage.png");
        assert!(!AssetId::LetterBox.is_photo());
    }
}
