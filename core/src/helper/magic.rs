use std::mem;
use std::ptr;

use core::masks::*;
use SQ;

use core::bit_twiddles::popcount64;
use core::{file_bb, rank_bb};
use tools::prng::PRNG;

/// Size of the magic rook table.
const ROOK_M_SIZE: usize = 102_400;
static mut ROOK_MAGICS: [SMagic; 64] = [SMagic::init(); 64];
static mut ROOK_TABLE: [u64; ROOK_M_SIZE] = [0; ROOK_M_SIZE];

/// Size of the magic bishop table.
const BISHOP_M_SIZE: usize = 5248;
static mut BISHOP_MAGICS: [SMagic; 64] = [SMagic::init(); 64];
static mut BISHOP_TABLE: [u64; BISHOP_M_SIZE] = [0; BISHOP_M_SIZE];

const B_DELTAS: [i8; 4] = [7, 9, -9, -7];
const R_DELTAS: [i8; 4] = [8, 1, -8, -1];

const SEEDS: [[u64; 8]; 2] = [
    [8977, 44_560, 54_343, 38_998, 5731, 95_205, 104_912, 17_020],
    [728, 10_316, 55_013, 32_803, 12_281, 15_100, 16_645, 255],
];

/// Known-good rook magics, indexed by square (A1 = 0 .. H8 = 63). Most of these were found by
/// Gerd Isenberg, Richard Pijl, Volker Annuss, Niklas Fiekas, Peter Österlund, and Grant Osborne
/// during the original fancy-magic search effort on the Chess Programming Wiki; the rest were
/// produced by the same search `gen_magic_board` runs below. Tried first for each square and
/// verified through the identical fill loop used for the random search, so a wrong or stale
/// constant here just falls back to searching rather than corrupting the table.
pub(crate) const SAVED_ROOK_MAGICS: [u64; 64] = [
    0x4080_0020_4000_1480,
    0x0040_0010_0140_2000,
    0x0300_2000_1810_4100,
    0x2100_0409_0110_0120,
    0x8a00_0600_0408_2070,
    0x0080_0144_0002_0080,
    0x1100_2500_208a_0004,
    0x0900_0042_2201_8100,
    0x0208_8002_28c0_0081,
    0x2280_4010_0340_2000,
    0x0008_8010_0020_0184,
    0x0001_0020_1000_0900,
    0x0182_0006_0010_6008,
    0x2058_8004_0080_0200,
    0x0004_8002_0080_0900,
    0x052d_0012_0040_a100,
    0x0540_0880_0080_24c1,
    0x2000_8480_4002_2000,
    0x0400_4100_1100_6000,
    0x0040_a100_3001_0108,
    0x1204_8080_0800_0402,
    0x0802_8080_0400_2201,
    0x1002_8080_5200_0500,
    0x0004_0a00_2112_4184,
    0x0640_0128_8008_8040,
    0x8410_4000_8020_008a,
    0x0400_2008_8010_0080,
    0x2001_0121_0009_1004,
    0x1200_0d01_0008_0010,
    0x6004_0004_0120_1008,
    0x7500_aa04_0008_4110,
    0x0100_0052_0004_0981,
    0x0040_8040_0280_0020,
    0x0470_0020_0640_0240,
    0x0001_2000_8080_1000,
    0x0000_0812_0200_2040,
    0x00c0_8044_0080_0800,
    0x9000_800a_0080_0400,
    0x0001_0004_0100_0600,
    0x0042_1088_ca00_2401,
    0x0000_c000_228d_8000,
    0x6410_0420_1440_4001,
    0x1002_0040_8226_0014,
    0x206a_0088_11c2_0021,
    0x0002_0018_1022_0024,
    0x2001_0200_0400_8080,
    0x1000_0801_100c_001a,
    0x0048_0082_5402_0011,
    0x48ff_fe99_fecf_aa00,
    0x48ff_fe99_fecf_aa00,
    0x497f_ffad_ff9c_2e00,
    0x613f_ffdd_ffce_9200,
    0xffff_ffe9_ffe7_ce00,
    0xffff_fff5_fff3_e600,
    0x0003_ff95_e5e6_a4c0,
    0x510f_fff5_f63c_96a0,
    0xebff_ffb9_ff9f_c526,
    0x61ff_fedd_feed_aeae,
    0x53bf_ffed_ffde_b1a2,
    0x127f_ffb9_ffdf_b5f6,
    0x411f_ffdd_ffdb_f4d6,
    0x0822_0024_0810_4502,
    0x0003_ffef_27ee_be74,
    0x7645_fffe_cbfe_a79e,
];

/// Known-good bishop magics, indexed the same way as `SAVED_ROOK_MAGICS`.
pub(crate) const SAVED_BISHOP_MAGICS: [u64; 64] = [
    0xffed_f9fd_7cfc_ffff,
    0xfc09_6285_4a77_f576,
    0x0012_2808_c102_a004,
    0x2851_2400_8240_0440,
    0x0011_1040_1100_0202,
    0x0008_2208_2000_0010,
    0xfc0a_66c6_4a7e_f576,
    0x7ffd_fdfc_bd79_ffff,
    0xfc08_46a6_4a34_fff6,
    0xfc08_7a87_4a3c_f7f6,
    0x0009_8802_0420_a000,
    0x8000_4404_0080_8200,
    0x208c_8450_c001_3407,
    0x1980_1105_2010_8030,
    0xfc08_64ae_59b4_ff76,
    0x3c08_60af_4b35_ff76,
    0x73c0_1af5_6cf4_cffb,
    0x41a0_1cfa_d64a_affc,
    0x0604_0002_04a2_0202,
    0x0002_8208_0602_4000,
    0x008a_0024_2201_0201,
    0x2082_0040_8801_0802,
    0x7c0c_028f_5b34_ff76,
    0xfc0a_028e_5ab4_df76,
    0x0810_0420_d104_1080,
    0x0904_5100_0210_0100,
    0x0202_2808_0406_4403,
    0x004c_0040_0c03_0082,
    0x0602_0010_0200_5011,
    0x7209_0200_c108_9000,
    0x4211_4104_2400_8805,
    0x0002_8484_2126_0804,
    0xc001_0412_1121_2004,
    0x0208_0188_0004_4800,
    0x0080_2064_1058_0800,
    0x0000_2011_0008_0084,
    0x0208_0034_0009_4100,
    0x2190_4102_0000_4058,
    0x0188_8214_0180_8080,
    0x2006_0a02_0000_c4c0,
    0xdcef_d9b5_4bfc_c09f,
    0xf95f_fa76_5afd_602b,
    0x200a_1041_1000_2040,
    0x0800_000c_0831_0c00,
    0x0218_0401_0a01_0400,
    0x1092_2004_0022_4100,
    0x43ff_9a5c_f4ca_0c01,
    0x4bff_cd8e_7c58_7601,
    0xfc0f_f286_5334_f576,
    0xfc0b_f6ce_5924_f576,
    0x8052_2060_8c30_0001,
    0x2084_1050_4202_0400,
    0xe018_8010_2206_0220,
    0x0001_1220_4901_0200,
    0xc3ff_b7dc_36ca_8c89,
    0xc3ff_8a54_f4ca_2c89,
    0xffff_fcfc_fd79_edff,
    0xfc08_63fc_cb14_7576,
    0x40a0_0400_6213_3000,
    0x0142_0280_0084_0400,
    0x0009_0900_1006_1200,
    0x0800_8445_2810_0308,
    0xfc08_7e8e_4bb2_f736,
    0x43ff_9e4e_f4ca_2c89,
];

#[cold]
pub fn init_magics() {
    unsafe {
        gen_magic_board(
            BISHOP_M_SIZE,
            &B_DELTAS,
            Some(&SAVED_BISHOP_MAGICS),
            BISHOP_MAGICS.as_mut_ptr(),
            BISHOP_TABLE.as_mut_ptr(),
        );
        gen_magic_board(
            ROOK_M_SIZE,
            &R_DELTAS,
            Some(&SAVED_ROOK_MAGICS),
            ROOK_MAGICS.as_mut_ptr(),
            ROOK_TABLE.as_mut_ptr(),
        );
    }
}

#[inline]
pub fn bishop_attacks(mut occupied: u64, square: u8) -> u64 {
    let magic_entry: &SMagic = unsafe { BISHOP_MAGICS.get_unchecked(square as usize) };
    occupied &= magic_entry.mask;
    occupied = occupied.wrapping_mul(magic_entry.magic);
    occupied = occupied.wrapping_shr(magic_entry.shift);
    unsafe { *(magic_entry.ptr as *const u64).add(occupied as usize) }
}

#[inline]
pub fn rook_attacks(mut occupied: u64, square: u8) -> u64 {
    let magic_entry: &SMagic = unsafe { ROOK_MAGICS.get_unchecked(square as usize) };
    occupied &= magic_entry.mask;
    occupied = occupied.wrapping_mul(magic_entry.magic);
    occupied = occupied.wrapping_shr(magic_entry.shift);
    unsafe { *(magic_entry.ptr as *const u64).add(occupied as usize) }
}

/// Structure inside a `MagicTable` for a specific hash. For a certain square,
/// contains a mask,  magic number, number to shift by, and a pointer into the array slice
/// where the position is held.
#[derive(Copy, Clone)]
struct SMagic {
    ptr: usize,
    mask: u64,
    magic: u64,
    shift: u32,
}

impl SMagic {
    pub const fn init() -> Self {
        SMagic {
            ptr: 0,
            mask: 0,
            magic: 0,
            shift: 0,
        }
    }
}

/// Temporary struct used to create an actual `SMagic` Object.
struct PreSMagic {
    start: usize,
    len: usize,
    mask: u64,
    magic: u64,
    shift: u32,
}

impl PreSMagic {
    pub fn init() -> PreSMagic {
        PreSMagic {
            start: 0,
            len: 0,
            mask: 0,
            magic: 0,
            shift: 0,
        }
    }

    // creates an array of PreSMagic
    pub unsafe fn init64() -> [PreSMagic; 64] {
        let arr: [PreSMagic; 64] = mem::MaybeUninit::uninit().assume_init();
        arr
    }

    // Helper method to compute the next index
    pub fn next_idx(&self) -> usize {
        self.start + self.len
    }
}

/// Creates the `MagicTable` struct. The table size is relative to the piece for computation,
/// and the deltas are the directions on the board the piece can go.
///
/// `known_magics`, if given, is tried first for each square before falling back to the seeded
/// random search below. A known magic is only trusted once it passes the same fill-and-verify
/// loop the random search uses, so a wrong entry just costs one wasted attempt.
#[cold]
unsafe fn gen_magic_board(
    table_size: usize,
    deltas: &[i8; 4],
    known_magics: Option<&[u64; 64]>,
    static_magics: *mut SMagic,
    attacks: *mut u64,
) {
    // Creates PreSMagic to hold raw numbers. Technically just adds room to stack
    let mut pre_sq_table: [PreSMagic; 64] = PreSMagic::init64();

    // Initializes each PreSMagic
    for table in pre_sq_table.iter_mut() {
        *table = PreSMagic::init();
    }

    // Occupancy tracks occupancy permutations. MAX permutations = subset of 12 bits = 2^12
    // Reference is similar, tracks the sliding moves from a given occupancy
    // Age tracks the best index for a current permutation
    let mut occupancy: [u64; 4096] = [0; 4096];
    let mut reference: [u64; 4096] = [0; 4096];
    let mut age: [i32; 4096] = [0; 4096];

    // Size tracks the size of permutations of the current block
    let mut size: usize;

    // b is used for generating the permutations through ripple - carry
    let mut b: u64;

    // current and i is a placeholder for actually generating correct magic numbers
    let mut current: i32 = 0;
    let mut i: usize;

    // set the first PreSMagic start = 0. Just in case.
    pre_sq_table[0].start = 0;

    // Loop through each square! s is a SQ
    for s in 0..64_u8 {
        // Magic number for later
        let mut magic: u64;

        // edges is the bitboard representation of the edges s is not on.
        // e.g. sq A1 is on FileA and Rank1, so edges = bitboard of FileH and Rank8
        // mask = occupancy mask of square s
        let edges: u64 = ((RANK_1 | RANK_8) & !rank_bb(s)) | ((FILE_A | FILE_H) & !file_bb(s));
        let mask: u64 = sliding_attack(deltas, s, 0) & !edges;

        // Shift = number of bits in 64 - bits in mask = log2(size)
        let shift: u32 = (64 - popcount64(mask)) as u32;
        b = 0;
        size = 0;

        // Ripple carry to determine occupancy, reference, and size
        'bit: loop {
            occupancy[size] = b;
            reference[size] = sliding_attack(deltas, s, b);
            size += 1;
            b = ((b).wrapping_sub(mask)) as u64 & mask;
            if b == 0 {
                break 'bit;
            }
        }

        // Set current PreSMagic length to be of size
        pre_sq_table[s as usize].len = size;

        // If there is a next square, set the start of it.
        if s < 63 {
            pre_sq_table[s as usize + 1].start = pre_sq_table[s as usize].next_idx();
        }
        // Create our Random Number Generator with a seed
        let mut rng = PRNG::init(SEEDS[1][SQ(s).rank() as usize]);

        // The known-good magic for this square, tried once before searching.
        let mut known_magic: Option<u64> = known_magics
            .map(|table| table[s as usize])
            .filter(|&m| m != 0);

        // Loop until we have found our magics!
        'outer: loop {
            // Try the known-good magic first (once); afterward, or if none was given, search.
            magic = match known_magic.take() {
                Some(m) => m,
                None => {
                    // Create a magic with our desired number of bits in the first 8 places
                    'first_in: loop {
                        magic = rng.sparse_rand();
                        if popcount64((magic.wrapping_mul(mask)).wrapping_shr(56)) >= 6 {
                            break 'first_in;
                        }
                    }
                    magic
                }
            };
            current += 1;
            i = 0;

            // Filling the attacks Vector up to size digits
            while i < size {
                // Magic part! The index is = ((occupancy[s] & mask) * magic >> shift)
                let index: usize = ((occupancy[i as usize] & mask).wrapping_mul(magic) as u64)
                    .wrapping_shr(shift) as usize;

                // Checking to see if we have visited this index already with a lower current number
                if age[index] < current {
                    // If we have visited with lower current, we replace it with this current number,
                    // as this current is higher and has gone through more passes
                    age[index] = current;
                    *attacks.add(pre_sq_table[s as usize].start + index) = reference[i];
                } else if *attacks.add(pre_sq_table[s as usize].start + index) != reference[i] {
                    // If a magic maps to the same index but different result, either magic is bad or we are done
                    break;
                }
                i += 1;
            }
            // If we have filled it up to size or greater, we are done
            if i >= size {
                break 'outer;
            }
        }
        // Set the remaining variables for the PreSMagic Struct
        pre_sq_table[s as usize].magic = magic;
        pre_sq_table[s as usize].mask = mask;
        pre_sq_table[s as usize].shift = shift;
    }

    // size = running total of total size
    let mut size = 0;
    for i in 0..64 {
        // begin ptr points to the beginning of the current slice in the vector
        let beginptr = attacks.add(size);

        // points to the static entry
        let staticptr: *mut SMagic = static_magics.add(i);
        let table_i: SMagic = SMagic {
            ptr: beginptr as usize,
            mask: pre_sq_table[i].mask,
            magic: pre_sq_table[i].magic,
            shift: pre_sq_table[i].shift,
        };

        ptr::copy::<SMagic>(&table_i, staticptr, 1);

        // Create the pointer to the slice with begin_ptr / length
        size += pre_sq_table[i].len;
    }
    // Sanity check
    assert_eq!(size, table_size);
}

/// Returns a bitboards of sliding attacks given an array of 4 deltas/
/// Does not include the original position/
/// Includes occupied bits if it runs into them, but stops before going further.
fn sliding_attack(deltas: &[i8; 4], sq: u8, occupied: u64) -> u64 {
    assert!(sq < 64);
    let mut attack: u64 = 0;
    let square: i16 = sq as i16;
    for delta in deltas.iter().take(4_usize) {
        let mut s: u8 = ((square as i16) + (*delta as i16)) as u8;
        'inner: while s < 64 && SQ(s as u8).distance(SQ(((s as i16) - (*delta as i16)) as u8)) == 1
        {
            attack |= 1_u64.wrapping_shl(s as u32);
            if occupied & 1_u64.wrapping_shl(s as u32) != 0 {
                break 'inner;
            }
            s = ((s as i16) + (*delta as i16)) as u8;
        }
    }
    attack
}
