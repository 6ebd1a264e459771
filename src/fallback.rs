//! Bundled fallback catalog
//!
//! Served when the backend is unreachable or returns nothing, so the
//! storefront always has something to show. Orders have no fallback; an
//! unreachable order history stays whatever it already was.

use rust_decimal::Decimal;

use crate::domain::{Category, PaymentMethod, PricingOption, Product};

fn tier(duration: &str, price: u32, duration_days: u32) -> PricingOption {
    PricingOption {
        duration: duration.to_string(),
        duration_days,
        price: Decimal::from(price),
        stock: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: u32,
    name: &str,
    slug: &str,
    category: &str,
    category_slug: &str,
    description: &str,
    pricing: Vec<PricingOption>,
    rating: f64,
    reviews: u32,
    sold: &str,
    stock_out: bool,
    is_hot_deal: bool,
    hot_deal_title: &str,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        category: category.to_string(),
        category_slug: category_slug.to_string(),
        description: description.to_string(),
        short_description: String::new(),
        image: format!("https://picsum.photos/seed/{slug}/800/600"),
        pricing,
        rating,
        reviews,
        sold: sold.to_string(),
        stock_out,
        is_featured: false,
        is_hot_deal,
        hot_deal_title: hot_deal_title.to_string(),
        related_product_ids: vec![],
    }
}

pub fn fallback_products() -> Vec<Product> {
    vec![
        product(
            101,
            "ChatGPT Plus",
            "chatgpt",
            "AI Tools",
            "ai-tools",
            "Access to GPT-4, DALL-E 3, and advanced data analysis. Experience \
             the future of conversational AI with multimodal capabilities.",
            vec![tier("1 Month", 600, 30), tier("3 Months", 1700, 90)],
            4.8,
            120,
            "500+",
            false,
            true,
            "Best Seller",
        ),
        product(
            102,
            "Midjourney Subscription",
            "midjourney",
            "AI Tools",
            "ai-tools",
            "Generate high-quality AI images from text prompts using the most \
             advanced art generation model in the world.",
            vec![tier("Basic Plan", 1200, 30)],
            4.5,
            80,
            "300+",
            false,
            false,
            "",
        ),
        product(
            201,
            "Canva Pro",
            "canva",
            "Design Tools",
            "design-tools",
            "Unlimited access to premium templates, photos, and tools. Brand \
             kits, background remover, and magic resize included.",
            vec![tier("1 Month", 150, 30)],
            4.9,
            1500,
            "5k+",
            true,
            true,
            "Flash Sale",
        ),
        product(
            301,
            "Netflix Premium",
            "netflix",
            "Entertainment",
            "entertainment",
            "Watch unlimited movies & TV shows in 4K UHD. Ad-free experience \
             on all your devices with offline downloads.",
            vec![tier("1 Month", 250, 30), tier("6 Months", 1400, 180)],
            4.7,
            900,
            "2k+",
            false,
            false,
            "",
        ),
    ]
}

pub fn fallback_categories() -> Vec<Category> {
    [
        ("AI Tools", "ai-tools", "fas fa-robot"),
        ("Design Tools", "design-tools", "fas fa-palette"),
        ("Entertainment", "entertainment", "fas fa-film"),
        ("Productivity", "productivity", "fas fa-cogs"),
        ("eBooks", "ebooks", "fas fa-book-open"),
        ("Courses", "courses", "fas fa-graduation-cap"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (name, slug, icon))| Category {
        id: i as u32 + 1,
        name: name.to_string(),
        slug: slug.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

pub fn fallback_payment_methods() -> Vec<PaymentMethod> {
    [
        ("bKash", "01700-123456"),
        ("Nagad", "01800-654321"),
        ("Rocket", "01900-987654"),
        ("Upay", "01600-112233"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (name, number))| PaymentMethod {
        id: i as u32 + 1,
        name: name.to_string(),
        number: number.to_string(),
        instructions: String::new(),
        is_custom: false,
        is_active: true,
    })
    .collect()
}

/// Storefront chrome settings. Cosmetic; there is no backend table for these.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub hero_banner: Vec<String>,
    /// Marquee scroll speed in pixels per second.
    pub hot_deals_speed: u32,
    /// Hero slide rotation interval in milliseconds.
    pub hero_slider_interval: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hero_banner: vec![
                "https://placehold.co/1200x500/7C3AED/ffffff?text=Premium+AI+Tools".to_string(),
                "https://placehold.co/1200x500/6D28D9/ffffff?text=Exclusive+Design+Assets"
                    .to_string(),
            ],
            hot_deals_speed: 40,
            hero_slider_interval: 5000,
        }
    }
}
