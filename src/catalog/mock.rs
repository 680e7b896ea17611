//! Static catalog content served until a real catalog backend exists.

use chrono::Utc;

use super::{
    CatalogProduct, Category, Influencer, MediaKind, OptionKind, OptionValue, ProductDetails,
    ProductOption, Short, Story, StoryItem,
};

const STORY_ITEM_SECONDS: f64 = 5.0;

fn image_item(id: &str, picsum_id: u32) -> StoryItem {
    StoryItem {
        id: id.to_string(),
        kind: MediaKind::Image,
        url: format!("https://picsum.photos/id/{picsum_id}/1080/1920"),
        duration_seconds: STORY_ITEM_SECONDS,
        created_at: Utc::now(),
    }
}

fn story(id: &str, username: &str, avatar: &str, is_live: bool, items: Vec<StoryItem>) -> Story {
    Story {
        id: id.to_string(),
        username: username.to_string(),
        avatar_image: format!("https://randomuser.me/api/portraits/{avatar}.jpg"),
        is_live,
        viewed: false,
        items,
    }
}

pub fn stories() -> Vec<Story> {
    vec![
        story(
            "1",
            "BestBuy_Tech",
            "men/91",
            false,
            vec![image_item("1-1", 1), image_item("1-2", 2)],
        ),
        story("2", "apple_zone", "men/32", true, vec![image_item("2-1", 3)]),
        story("3", "gaming_hub", "men/85", false, vec![image_item("3-1", 4)]),
        story("4", "samsung_deals", "women/63", true, vec![image_item("4-1", 5)]),
        story("5", "laptop_expert", "men/55", false, vec![image_item("5-1", 6)]),
        story("6", "smart_home", "women/89", false, vec![image_item("6-1", 7)]),
    ]
}

fn value(id: &str, label: &str, available: bool, image: Option<u32>) -> OptionValue {
    OptionValue {
        id: id.to_string(),
        label: label.to_string(),
        available,
        image: image.map(|n| format!("https://picsum.photos/id/{n}/100/100")),
    }
}

/// The product attached to every shoppable video in the feed.
pub fn product() -> ProductDetails {
    ProductDetails {
        id: "1".to_string(),
        title: "iPad mini (A17 Pro chip - Built for Apple Apple Intelligence)".to_string(),
        price: 279.99,
        original_price: Some(299.99),
        images: (1..=3)
            .map(|n| format!("https://picsum.photos/id/{n}/400/400"))
            .collect(),
        rating: 4.6,
        review_count: 483,
        pickup_date: "Mar 3".to_string(),
        options: vec![
            ProductOption {
                kind: OptionKind::Color,
                name: "Color".to_string(),
                values: vec![
                    value("space-gray", "Space Gray", true, Some(4)),
                    value("silver", "Silver", true, Some(5)),
                    value("rose", "Rose", false, Some(6)),
                ],
            },
            ProductOption {
                kind: OptionKind::Storage,
                name: "Storage".to_string(),
                values: vec![
                    value("128gb", "128GB", true, None),
                    value("256gb", "256GB", true, None),
                    value("512gb", "512GB", false, None),
                ],
            },
        ],
    }
}

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}?auto=format&fit=crop&q=80")
}

pub fn categories() -> Vec<Category> {
    [
        ("Smartphones", "1511707171634-5f897ff02aa9", "smartphones", 24),
        ("Laptops", "1496181133206-80ce9b88a853", "laptops", 18),
        ("Cameras", "1516035069371-29a1b244cc32", "cameras", 15),
        ("Headphones", "1505740420928-5e560c06d30e", "headphones", 21),
        ("TVs", "1593784991095-a205069470b6", "tvs", 12),
        ("Gaming", "1542751371-adc38448a05e", "gaming", 27),
    ]
    .into_iter()
    .map(|(title, photo, slug, influencer_count)| Category {
        title: title.to_string(),
        image: unsplash(photo),
        slug: slug.to_string(),
        influencer_count,
    })
    .collect()
}

pub fn influencers() -> Vec<Influencer> {
    [
        ("1", "Tech Review Pro", "@techreviewpro", "1600486913747-55e5470d6f40", 125_000, "smartphones",
            "Reviewing the latest in mobile tech. Your go-to source for smartphone insights."),
        ("2", "Mobile Maven", "@mobilemaven", "1494790108377-be9c29b29330", 89_000, "smartphones",
            "Smartphone photography expert. Helping you capture life's moments."),
        ("3", "Laptop Legend", "@laptoplegend", "1472099645785-5658abf4ff4e", 156_000, "laptops",
            "Your guide to the best laptops for work and play."),
        ("4", "Gaming Guru", "@gamingguru", "1573496359142-b8d87734a5a2", 234_000, "gaming",
            "Professional gamer sharing the best gaming setups and reviews."),
        ("5", "Camera Creative", "@cameracreative", "1568602471122-7832951cc4c5", 92_000, "cameras",
            "Professional photographer reviewing the latest camera gear."),
        ("6", "Audio Expert", "@audioexpert", "1580489944761-15a19d654956", 78_000, "headphones",
            "Audiophile and music producer. Testing the best headphones for you."),
        ("7", "TV Tech", "@tvtech", "1507003211169-0a1dd7228f2d", 112_000, "tvs",
            "Home theater enthusiast. Bringing cinema quality to your living room."),
        ("8", "Smart Home Sage", "@smarthomesage", "1438761681033-6461ffad8d80", 143_000, "smartphones",
            "Making homes smarter, one device at a time."),
    ]
    .into_iter()
    .map(|(id, name, username, photo, followers, category, bio)| Influencer {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        avatar: unsplash(photo),
        followers,
        category: category.to_string(),
        bio: bio.to_string(),
    })
    .collect()
}

pub fn catalog_products() -> Vec<CatalogProduct> {
    [
        ("1", "Ray-Ban Meta - Skyler smart glasses with Meta AI", "1572635196237-14b3f281503f", 299.0, "smartphones"),
        ("2", "iPhone 15 Pro Max - Natural Titanium", "1696446701796-da61225697cc", 1199.0, "smartphones"),
        ("3", "MacBook Pro 16\" M3 Max", "1517336714731-489689fd1ca4", 2499.0, "laptops"),
        ("4", "Sony WH-1000XM5 Wireless Headphones", "1505740420928-5e560c06d30e", 399.0, "headphones"),
        ("5", "Canon EOS R5 Mirrorless Camera", "1516035069371-29a1b244cc32", 3899.0, "cameras"),
        ("6", "LG C3 65\" OLED evo Smart TV", "1593784991095-a205069470b6", 1999.0, "tvs"),
        ("7", "PlayStation 5 Digital Edition", "1606813907291-d86efa9b94db", 499.0, "gaming"),
        ("8", "Samsung Galaxy S24 Ultra", "1610945415295-d9bbf067e59c", 1299.0, "smartphones"),
        ("9", "Dell XPS 15 OLED", "1593642632823-8f785ba67e45", 2199.0, "laptops"),
        ("10", "AirPods Pro (2nd Generation)", "1600294037681-c80b4cb5b434", 249.0, "headphones"),
    ]
    .into_iter()
    .map(|(id, title, photo, price, category)| CatalogProduct {
        id: id.to_string(),
        title: title.to_string(),
        images: vec![unsplash(photo)],
        price,
        category: category.to_string(),
    })
    .collect()
}

pub fn shorts() -> Vec<Short> {
    [
        ("Best Buy", 21, "b4IF6wfLi8M", "Check out the latest tech at Best Buy! #bestbuy #tech", 1_200_000),
        ("Tech Deals", 22, "pNvC9a3ABo0", "Best Buy Gaming Laptop Deals 2024 #gaming #laptops", 850_000),
        ("Gadget Guide", 23, "FHBo5RgFnSk", "Top 5 Smartphones at Best Buy #phones #tech", 950_000),
        ("Tech Today", 24, "wci_Yscw0B4", "Best Buy Home Theater Setup Guide #hometheater", 750_000),
    ]
    .into_iter()
    .map(|(username, portrait, video_id, description, followers)| Short {
        username: username.to_string(),
        profile_image: format!("https://randomuser.me/api/portraits/men/{portrait}.jpg"),
        video_id: video_id.to_string(),
        description: Some(description.to_string()),
        followers: Some(followers),
    })
    .collect()
}
