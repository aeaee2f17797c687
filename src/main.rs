use log::info;

use pagehash::buffer::PageTable;
use pagehash::common::{initialize_logger, FrameId, HashTableConfig, PageId};

fn main() {
    initialize_logger();

    println!("Pagehash - extendible hashing page table");
    println!("========================================\n");

    // Small buckets so the directory visibly grows
    let config = HashTableConfig::default().with_bucket_capacity(4);
    let page_table = PageTable::with_config(config).expect("Invalid page table configuration");
    println!(
        "Created page table with bucket capacity {}\n",
        config.bucket_capacity
    );

    // Simulate a buffer pool reading 64 pages into 64 frames
    for i in 0..64u32 {
        page_table
            .map(PageId::new(i * 7), FrameId::new(i))
            .expect("Failed to map page");
    }
    info!("Mapped {} pages", page_table.len());

    println!("After mapping 64 pages:");
    println!("  - Global depth: {}", page_table.global_depth());
    println!("  - Buckets: {}", page_table.num_buckets());

    for page in [PageId::new(0), PageId::new(21), PageId::new(22)] {
        match page_table.lookup(page) {
            Some(frame) => println!("  - {} is resident in {}", page, frame),
            None => println!("  - {} is not buffered", page),
        }
    }

    // Evict every other page
    let evicted = (0..64u32)
        .step_by(2)
        .filter(|i| page_table.unmap(PageId::new(i * 7)))
        .count();

    println!("\nEvicted {} pages:", evicted);
    println!("  - Resident pages: {}", page_table.len());
    println!("  - Buckets: {} (buckets never merge)", page_table.num_buckets());

    page_table
        .verify_integrity()
        .expect("Page table invariants violated");
    println!("\nDemo completed successfully!");
}
