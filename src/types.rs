mod key_id;
mod mpi;
mod packet;
mod params;
mod password;
mod s2k;

pub use self::{
    key_id::{Fingerprint, KeyId},
    mpi::{Mpi, MAX_EXTERN_MPI_BITS},
    packet::*,
    params::*,
    password::Password,
    s2k::{S2kUsage, StringToKey},
};
pub(crate) use self::mpi::{read_mpi_slice, secret_mpi_len, write_secret_mpi};
