//! Posts and sale listings.
//!
//! A [`Post`] belongs to the account that published it and is never deleted.
//! Content is one of three variants; only sale listings carry mutable state.
//!
//! # Sale listing invariants
//!
//! - Price is finite and non-negative at creation and after every discount
//! - `sold` only ever goes from false to true

use std::{fmt, str::FromStr};

use crate::{account::AccountId, error::NetworkError};

/// Post identifier, assigned in publication order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostId(usize);

impl PostId {
    /// Create an id from its raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index of this id.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "post#{}", self.0)
    }
}

/// Closed set of post kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostKind {
    /// Plain text.
    Text,
    /// Image reference.
    Image,
    /// Item for sale.
    Sale,
}

impl PostKind {
    /// Canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Sale => "Sale",
        }
    }
}

impl FromStr for PostKind {
    type Err = NetworkError;

    /// Parse a kind name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Text, Self::Image, Self::Sale]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| NetworkError::UnknownPostKind { kind: s.to_string() })
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped publish request, as received from a caller that names the kind.
///
/// `body` is the text, the image path, or the listing title depending on the
/// kind. `price` and `location` are only read for sale listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostRequest {
    /// Text body, image path, or listing title.
    pub body: String,
    /// Asking price (sale only).
    pub price: Option<f64>,
    /// Pickup location (sale only).
    pub location: Option<String>,
}

impl PostRequest {
    /// Request with only a body.
    pub fn body(body: impl Into<String>) -> Self {
        Self { body: body.into(), ..Self::default() }
    }

    /// Request for a sale listing.
    pub fn sale(title: impl Into<String>, price: f64, location: impl Into<String>) -> Self {
        Self { body: title.into(), price: Some(price), location: Some(location.into()) }
    }
}

/// Item for sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleListing {
    title: String,
    price: f64,
    location: String,
    sold: bool,
}

impl SaleListing {
    /// Create an unsold listing.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidPrice` if `price` is negative or not
    /// finite.
    pub fn new(
        title: impl Into<String>,
        price: f64,
        location: impl Into<String>,
    ) -> Result<Self, NetworkError> {
        if !price.is_finite() || price < 0.0 {
            return Err(NetworkError::InvalidPrice { price });
        }

        Ok(Self { title: title.into(), price, location: location.into(), sold: false })
    }

    /// Listing title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Pickup location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether the item is sold.
    pub fn is_sold(&self) -> bool {
        self.sold
    }

    /// Price after discounting by `percent`, without applying it.
    ///
    /// The reduction is `price / percent`, not `price * percent / 100`. Returns
    /// `None` when the percent is not positive and finite or the result would
    /// be negative or not finite.
    pub fn discounted_price(&self, percent: f64) -> Option<f64> {
        if !percent.is_finite() || percent <= 0.0 {
            return None;
        }

        let next = self.price - self.price / percent;
        (next.is_finite() && next >= 0.0).then_some(next)
    }

    fn mark_sold(&mut self) {
        self.sold = true;
    }

    fn set_price(&mut self, price: f64) {
        self.price = price;
    }
}

/// Variant-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PostContent {
    /// Plain text.
    Text {
        /// Post body.
        body: String,
    },
    /// Image reference.
    Image {
        /// Path or URL of the image.
        path: String,
    },
    /// Item for sale.
    Sale(SaleListing),
}

impl PostContent {
    /// Build the requested variant from an untyped request.
    ///
    /// Only the variant named by `kind` is constructed.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::MissingField` if a sale request lacks price or
    /// location, and `NetworkError::InvalidPrice` for an unusable price.
    pub fn build(kind: PostKind, request: PostRequest) -> Result<Self, NetworkError> {
        match kind {
            PostKind::Text => Ok(Self::Text { body: request.body }),
            PostKind::Image => Ok(Self::Image { path: request.body }),
            PostKind::Sale => {
                let price = request
                    .price
                    .ok_or(NetworkError::MissingField { kind: "Sale", field: "price" })?;
                let location = request
                    .location
                    .ok_or(NetworkError::MissingField { kind: "Sale", field: "location" })?;
                SaleListing::new(request.body, price, location).map(Self::Sale)
            },
        }
    }

    /// Kind of this content.
    pub fn kind(&self) -> PostKind {
        match self {
            Self::Text { .. } => PostKind::Text,
            Self::Image { .. } => PostKind::Image,
            Self::Sale(_) => PostKind::Sale,
        }
    }
}

/// A published post.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: PostId,
    owner: AccountId,
    content: PostContent,
}

impl Post {
    /// Create a post.
    pub fn new(id: PostId, owner: AccountId, content: PostContent) -> Self {
        Self { id, owner, content }
    }

    /// Post id.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Publishing account.
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Payload.
    pub fn content(&self) -> &PostContent {
        &self.content
    }

    /// The listing, if this is a sale post.
    pub fn listing(&self) -> Option<&SaleListing> {
        match &self.content {
            PostContent::Sale(listing) => Some(listing),
            _ => None,
        }
    }

    fn listing_mut(&mut self) -> Result<&mut SaleListing, NetworkError> {
        match &mut self.content {
            PostContent::Sale(listing) => Ok(listing),
            _ => Err(NetworkError::NotForSale { post: self.id }),
        }
    }

    /// Mark the listing sold. Marking an already sold listing succeeds.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotForSale` if this is not a sale post.
    pub fn mark_sold(&mut self) -> Result<(), NetworkError> {
        self.listing_mut()?.mark_sold();
        Ok(())
    }

    /// Apply a discount and return the new price.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotForSale`, `NetworkError::AlreadySold`, or
    /// `NetworkError::InvalidDiscount`. The price is unchanged on error.
    pub fn discount(&mut self, percent: f64) -> Result<f64, NetworkError> {
        let id = self.id;
        let listing = self.listing_mut()?;
        if listing.is_sold() {
            return Err(NetworkError::AlreadySold { post: id });
        }

        let next = listing
            .discounted_price(percent)
            .ok_or(NetworkError::InvalidDiscount { percent, price: listing.price() })?;
        listing.set_price(next);

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sale_post(price: f64) -> Post {
        let listing = SaleListing::new("bike", price, "Haifa").unwrap();
        Post::new(PostId::new(0), AccountId::new(0), PostContent::Sale(listing))
    }

    fn price_of(post: &Post) -> f64 {
        post.listing().map(SaleListing::price).unwrap()
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Text".parse::<PostKind>().unwrap(), PostKind::Text);
        assert_eq!("image".parse::<PostKind>().unwrap(), PostKind::Image);
        assert_eq!("SALE".parse::<PostKind>().unwrap(), PostKind::Sale);
    }

    #[test]
    fn unknown_kind_is_hard_error() {
        let err = "Video".parse::<PostKind>().unwrap_err();
        assert_eq!(err, NetworkError::UnknownPostKind { kind: "Video".to_string() });
        assert!(!err.is_rejection());
    }

    #[test]
    fn build_constructs_only_requested_variant() {
        let text = PostContent::build(PostKind::Text, PostRequest::body("hello")).unwrap();
        assert_eq!(text, PostContent::Text { body: "hello".to_string() });

        let image = PostContent::build(PostKind::Image, PostRequest::body("cat.png")).unwrap();
        assert_eq!(image, PostContent::Image { path: "cat.png".to_string() });

        let sale = PostContent::build(PostKind::Sale, PostRequest::body("bike"));
        assert_eq!(sale, Err(NetworkError::MissingField { kind: "Sale", field: "price" }));
    }

    #[test]
    fn build_sale_requires_location() {
        let request = PostRequest { body: "bike".into(), price: Some(10.0), location: None };
        let result = PostContent::build(PostKind::Sale, request);
        assert_eq!(result, Err(NetworkError::MissingField { kind: "Sale", field: "location" }));
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(matches!(
            SaleListing::new("bike", -1.0, "Haifa"),
            Err(NetworkError::InvalidPrice { .. })
        ));
        assert!(SaleListing::new("bike", f64::NAN, "Haifa").is_err());
    }

    #[test]
    fn discount_uses_reciprocal_reduction() {
        let mut post = sale_post(100.0);
        let price = post.discount(25.0).unwrap();
        assert!((price - 96.0).abs() < f64::EPSILON);
        assert!((price_of(&post) - 96.0).abs() < f64::EPSILON);
    }

    #[test]
    fn discount_on_sold_listing_fails() {
        let mut post = sale_post(100.0);
        post.mark_sold().unwrap();

        let result = post.discount(25.0);
        assert_eq!(result, Err(NetworkError::AlreadySold { post: PostId::new(0) }));
        assert!((price_of(&post) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn discount_rejects_unusable_percent() {
        let mut post = sale_post(100.0);
        for percent in [0.0, -5.0, f64::NAN, f64::INFINITY, 0.5] {
            assert!(
                matches!(post.discount(percent), Err(NetworkError::InvalidDiscount { .. })),
                "percent {percent} should be rejected"
            );
        }
        assert!((price_of(&post) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mark_sold_is_monotonic() {
        let mut post = sale_post(5.0);
        post.mark_sold().unwrap();
        post.mark_sold().unwrap();
        assert!(post.listing().is_some_and(SaleListing::is_sold));
    }

    #[test]
    fn sale_operations_on_text_post_fail() {
        let mut post =
            Post::new(PostId::new(3), AccountId::new(0), PostContent::Text { body: "hi".into() });
        assert_eq!(post.mark_sold(), Err(NetworkError::NotForSale { post: PostId::new(3) }));
        assert_eq!(post.discount(10.0), Err(NetworkError::NotForSale { post: PostId::new(3) }));
    }

    proptest! {
        #[test]
        fn prop_price_never_negative(
            price in 0.0..1_000_000.0f64,
            percents in prop::collection::vec(-10.0..200.0f64, 0..16)
        ) {
            let mut post = sale_post(price);
            for percent in percents {
                let _ = post.discount(percent);
                let current = price_of(&post);
                prop_assert!(current.is_finite());
                prop_assert!(current >= 0.0);
            }
        }
    }
}
